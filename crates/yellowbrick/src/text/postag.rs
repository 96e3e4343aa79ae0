use std::collections::BTreeMap;

use crate::base::{Visualize, Visualizer};
use crate::config::{PosTagConfig, Tagset};
use crate::error::{Result, YellowbrickError};
use crate::metrics::unique_labels;
use crate::plot::{bar_stack, resolve_colors, Axes};

pub const PENN_TAGS: [&str; 20] = [
    "noun", "verb", "adjective", "adverb", "preposition", "determiner", "pronoun", "conjunction",
    "infinitive", "wh- word", "modal", "possessive", "existential", "punctuation", "digit",
    "non-English", "interjection", "list", "symbol", "other",
];

pub const UNIVERSAL_TAGS: [&str; 14] = [
    "noun", "verb", "adjective", "adverb", "adposition", "determiner", "pronoun", "conjunction",
    "infinitive", "punctuation", "number", "interjection", "symbol", "other",
];

/// Penn Treebank tags counted as punctuation.
pub const PUNCT_TAGS: [&str; 9] = [".", ":", ",", "``", "''", "(", ")", "#", "$"];

/// A sentence of `(token, tag)` pairs.
pub type TaggedSentence = Vec<(String, String)>;

/// A document of tagged sentences.
pub type TaggedDocument = Vec<TaggedSentence>;

/// Label used for the single group when bars are not stacked.
const DOCUMENTS: &str = "documents";

/// Map a Penn Treebank tag to its part-of-speech category.
pub fn penn_category(tag: &str) -> &'static str {
    if tag.starts_with('N') {
        "noun"
    } else if tag.starts_with('J') {
        "adjective"
    } else if tag.starts_with('V') {
        "verb"
    } else if tag.starts_with("RB") || tag == "RP" {
        "adverb"
    } else if tag.starts_with("PR") {
        "pronoun"
    } else if tag.starts_with('W') {
        "wh- word"
    } else if PUNCT_TAGS.contains(&tag) {
        "punctuation"
    } else {
        match tag {
            "CC" => "conjunction",
            "CD" => "digit",
            "DT" | "PDT" => "determiner",
            "EX" => "existential",
            "FW" => "non-English",
            "IN" => "preposition",
            "POS" => "possessive",
            "LS" => "list",
            "MD" => "modal",
            "TO" => "infinitive",
            "UH" => "interjection",
            "SYM" => "symbol",
            _ => "other",
        }
    }
}

/// Map a Universal Dependencies tag to its category; `None` for tokens that
/// are not counted (whitespace).
pub fn universal_category(tag: &str) -> Option<&'static str> {
    let category = match tag {
        "SPACE" => return None,
        "NOUN" | "PROPN" => "noun",
        "ADJ" => "adjective",
        "VERB" => "verb",
        "ADV" | "PART" => "adverb",
        "ADP" => "adposition",
        "PRON" => "pronoun",
        "CCONJ" => "conjunction",
        "PUNCT" => "punctuation",
        "DET" => "determiner",
        "NUM" => "number",
        "INTJ" => "interjection",
        "SYM" => "symbol",
        _ => "other",
    };
    Some(category)
}

impl Tagset {
    /// Categories of this tagset in their default display order.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Tagset::PennTreebank => &PENN_TAGS,
            Tagset::Universal => &UNIVERSAL_TAGS,
        }
    }

    /// Category of `tag`, or `None` when the token is skipped.
    pub fn categorize(&self, tag: &str) -> Option<&'static str> {
        match self {
            Tagset::PennTreebank => Some(penn_category(tag)),
            Tagset::Universal => universal_category(tag),
        }
    }
}

/// Bar chart of part-of-speech counts in a tagged corpus.
///
/// With `stack` set, one stacked segment is drawn per class label and `fit`
/// requires one label per document.
pub struct PosTagVisualizer {
    base: Visualizer,
    tagset: Tagset,
    colormap: Option<String>,
    colors: Option<Vec<String>>,
    frequency: bool,
    stack: bool,
    /// label -> count per category, in `tagset.categories()` order
    pos_tag_counts: BTreeMap<String, Vec<usize>>,
    /// categories in the order they were last drawn
    drawn_tags: Vec<String>,
}

impl PosTagVisualizer {
    pub fn new(config: &PosTagConfig) -> Result<Self> {
        let tagset: Tagset = config.tagset.parse()?;
        Ok(Self {
            base: Visualizer::from_config(&config.base),
            tagset,
            colormap: config.colormap.clone(),
            colors: config.colors.clone(),
            frequency: config.frequency,
            stack: config.stack,
            pos_tag_counts: BTreeMap::new(),
            drawn_tags: Vec::new(),
        })
    }

    pub fn with_ax(mut self, ax: Axes) -> Self {
        self.base.set_ax(ax);
        self
    }

    pub fn tagset(&self) -> Tagset {
        self.tagset
    }

    /// Group labels: `["documents"]`, or the sorted classes when stacking.
    pub fn labels(&self) -> Vec<String> {
        self.pos_tag_counts.keys().cloned().collect()
    }

    /// Count of `category` tokens under `label`.
    pub fn count(&self, label: &str, category: &str) -> Option<usize> {
        let idx = self.tagset.categories().iter().position(|c| *c == category)?;
        self.pos_tag_counts.get(label).map(|counts| counts[idx])
    }

    /// Category -> count, summed over all labels.
    pub fn totals(&self) -> BTreeMap<&'static str, usize> {
        self.tagset
            .categories()
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let total = self.pos_tag_counts.values().map(|counts| counts[i]).sum();
                (*category, total)
            })
            .collect()
    }

    /// Number of tokens counted by the last `fit`.
    pub fn token_count(&self) -> usize {
        self.pos_tag_counts.values().flatten().sum()
    }

    /// Categories in the order they were drawn.
    pub fn drawn_tags(&self) -> &[String] {
        &self.drawn_tags
    }

    fn count_corpus(&self, corpus: &[TaggedDocument], y: Option<&[String]>) -> Result<BTreeMap<String, Vec<usize>>> {
        let groups: Option<&[String]> = if self.stack {
            let y = y.ok_or_else(|| YellowbrickError::Validation("Specify y for stack=True".to_string()))?;
            if y.len() < corpus.len() {
                return Err(YellowbrickError::Validation(format!(
                    "stack=True needs one label per document, got {} labels for {} documents",
                    y.len(),
                    corpus.len()
                )));
            }
            Some(y)
        } else {
            None
        };

        let categories = self.tagset.categories();
        let labels = match groups {
            Some(y) => unique_labels(y),
            None => vec![DOCUMENTS.to_string()],
        };
        let mut counts: BTreeMap<String, Vec<usize>> = labels
            .into_iter()
            .map(|label| (label, vec![0; categories.len()]))
            .collect();

        for (idx, document) in corpus.iter().enumerate() {
            let label = groups.map_or(DOCUMENTS, |y| y[idx].as_str());
            let counter = counts
                .get_mut(label)
                .ok_or_else(|| YellowbrickError::Validation(format!("unknown label '{}'", label)))?;
            for (_, tag) in document.iter().flatten() {
                let Some(category) = self.tagset.categorize(tag) else {
                    continue;
                };
                if let Some(i) = categories.iter().position(|c| *c == category) {
                    counter[i] += 1;
                }
            }
        }
        Ok(counts)
    }
}

impl Visualize for PosTagVisualizer {
    type Input = [TaggedDocument];

    fn visualizer(&self) -> &Visualizer {
        &self.base
    }

    fn visualizer_mut(&mut self) -> &mut Visualizer {
        &mut self.base
    }

    fn name(&self) -> String {
        "PosTagVisualizer".to_string()
    }

    fn fit(&mut self, corpus: &[TaggedDocument], y: Option<&[String]>) -> Result<&mut Self> {
        self.pos_tag_counts = self.count_corpus(corpus, y)?;
        log::debug!(
            "Counted {} {} tokens over {} documents",
            self.token_count(),
            self.tagset.display_name(),
            corpus.len()
        );
        self.draw()?;
        Ok(self)
    }

    fn draw(&mut self) -> Result<Axes> {
        if self.pos_tag_counts.is_empty() {
            return Err(YellowbrickError::Validation(
                "call fit() before drawing part-of-speech counts".to_string(),
            ));
        }
        let categories = self.tagset.categories();

        let mut order: Vec<usize> = (0..categories.len()).collect();
        if self.frequency {
            let totals: Vec<usize> = (0..categories.len())
                .map(|i| self.pos_tag_counts.values().map(|counts| counts[i]).sum())
                .collect();
            order.sort_by(|a, b| totals[*b].cmp(&totals[*a]));
        }

        let ticks: Vec<String> = order.iter().map(|&i| categories[i].to_string()).collect();
        let data: Vec<Vec<f64>> = self
            .pos_tag_counts
            .values()
            .map(|counts| order.iter().map(|&i| counts[i] as f64).collect())
            .collect();

        let ax = self.base.ax();
        if self.stack {
            bar_stack(
                &ax,
                &data,
                &self.labels(),
                &ticks,
                self.colors.as_deref(),
                self.colormap.as_deref(),
            )?;
        } else {
            let colors = resolve_colors(ticks.len(), self.colormap.as_deref(), self.colors.as_deref())?;
            let x = (0..ticks.len()).map(|i| i as f64).collect();
            ax.bar(x, data[0].clone(), colors, None);
        }

        self.drawn_tags = ticks;
        Ok(ax)
    }

    fn finalize(&mut self) -> Result<Axes> {
        let ax = self.base.ax();
        ax.set_ylabel("Count");
        let mut xlabel = format!("{} part-of-speech tags", self.tagset.display_name());
        if self.frequency {
            xlabel.push_str(", sorted by frequency");
        }
        ax.set_xlabel(xlabel);

        if !self.stack {
            let positions = (0..self.drawn_tags.len()).map(|i| i as f64).collect();
            ax.set_xticks(positions, self.drawn_tags.clone(), 90.0);
        }

        let title = format!("PosTag plot for {}-token corpus", self.token_count());
        self.base.set_title(&title);
        Ok(ax)
    }
}

/// Count and draw the parts of speech in `corpus`, returning the drawn axes.
pub fn postag(corpus: &[TaggedDocument], y: Option<&[String]>, config: &PosTagConfig) -> Result<Axes> {
    let mut viz = PosTagVisualizer::new(config)?;
    viz.fit(corpus, y)?;
    Ok(viz.ax())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::Artist;

    fn doc(tags: &[&str]) -> TaggedDocument {
        vec![tags
            .iter()
            .enumerate()
            .map(|(i, tag)| (format!("tok{}", i), tag.to_string()))
            .collect()]
    }

    #[test]
    fn test_penn_categories() {
        assert_eq!(penn_category("NNP"), "noun");
        assert_eq!(penn_category("VBZ"), "verb");
        assert_eq!(penn_category("JJR"), "adjective");
        assert_eq!(penn_category("RP"), "adverb");
        assert_eq!(penn_category("PRP$"), "pronoun");
        assert_eq!(penn_category("WDT"), "wh- word");
        assert_eq!(penn_category("DT"), "determiner");
        assert_eq!(penn_category("PDT"), "determiner");
        assert_eq!(penn_category("POS"), "possessive");
        assert_eq!(penn_category("$"), "punctuation");
        assert_eq!(penn_category("TO"), "infinitive");
        assert_eq!(penn_category("XX"), "other");
    }

    #[test]
    fn test_universal_skips_space() {
        assert_eq!(universal_category("PROPN"), Some("noun"));
        assert_eq!(universal_category("PART"), Some("adverb"));
        assert_eq!(universal_category("X"), Some("other"));
        assert_eq!(universal_category("SPACE"), None);
    }

    #[test]
    fn test_fit_counts_documents() {
        let corpus = vec![doc(&["DT", "NN", "VBZ", "."]), doc(&["PDT", "DT", "NNS"])];
        let mut viz = PosTagVisualizer::new(&PosTagConfig::default()).unwrap();
        viz.fit(&corpus, None).unwrap();

        assert_eq!(viz.labels(), vec!["documents".to_string()]);
        assert_eq!(viz.count("documents", "determiner"), Some(3));
        assert_eq!(viz.count("documents", "noun"), Some(2));
        assert_eq!(viz.token_count(), 7);
        assert_eq!(viz.drawn_tags().len(), PENN_TAGS.len());
    }

    #[test]
    fn test_frequency_order_is_stable_descending() {
        let corpus = vec![doc(&["VB", "VB", "NN", "JJ"])];
        let config = PosTagConfig {
            frequency: true,
            ..Default::default()
        };
        let mut viz = PosTagVisualizer::new(&config).unwrap();
        viz.fit(&corpus, None).unwrap();

        // noun and adjective tie and keep their tagset order
        assert_eq!(&viz.drawn_tags()[..4], &["verb", "noun", "adjective", "adverb"]);
        viz.finalize().unwrap();
        let state = viz.ax().snapshot();
        assert_eq!(
            state.xlabel.as_deref(),
            Some("Penn Treebank part-of-speech tags, sorted by frequency")
        );
    }

    #[test]
    fn test_stack_groups_by_label() {
        let corpus = vec![
            doc(&["NOUN", "VERB"]),
            doc(&["NOUN", "SPACE"]),
            doc(&["ADJ"]),
        ];
        let y: Vec<String> = ["spam", "ham", "spam"].iter().map(|s| s.to_string()).collect();
        let config = PosTagConfig {
            tagset: "universal".into(),
            stack: true,
            ..Default::default()
        };
        let mut viz = PosTagVisualizer::new(&config).unwrap();
        viz.fit(&corpus, Some(y.as_slice())).unwrap();

        assert_eq!(viz.labels(), vec!["ham".to_string(), "spam".to_string()]);
        assert_eq!(viz.count("spam", "noun"), Some(1));
        assert_eq!(viz.count("spam", "adjective"), Some(1));
        assert_eq!(viz.count("ham", "noun"), Some(1));
        assert_eq!(viz.token_count(), 4);

        let bars = viz
            .ax()
            .snapshot()
            .artists
            .iter()
            .filter(|a| matches!(a, Artist::Bars(_)))
            .count();
        assert_eq!(bars, 2);
    }

    #[test]
    fn test_stack_requires_labels() {
        let corpus = vec![doc(&["NN"]), doc(&["VB"])];
        let config = PosTagConfig {
            stack: true,
            ..Default::default()
        };
        let mut viz = PosTagVisualizer::new(&config).unwrap();
        assert!(matches!(viz.fit(&corpus, None), Err(YellowbrickError::Validation(_))));

        let short = vec!["a".to_string()];
        assert!(matches!(
            viz.fit(&corpus, Some(short.as_slice())),
            Err(YellowbrickError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_tagset() {
        let config = PosTagConfig {
            tagset: "invalid".into(),
            ..Default::default()
        };
        let err = PosTagVisualizer::new(&config).err().unwrap().to_string();
        assert!(err.contains("penn_treebank, universal"));
    }

    #[test]
    fn test_finalize_title_counts_tokens() {
        let corpus = vec![doc(&["NN", "VB", "DT"])];
        let mut viz = PosTagVisualizer::new(&PosTagConfig::default()).unwrap();
        viz.fit(&corpus, None).unwrap();
        viz.finalize().unwrap();

        let state = viz.ax().snapshot();
        assert_eq!(state.title.as_deref(), Some("PosTag plot for 3-token corpus"));
        assert_eq!(state.ylabel.as_deref(), Some("Count"));
        assert_eq!(state.xticks.unwrap().rotation, 90.0);
    }
}

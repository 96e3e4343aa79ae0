mod common;

use yellowbrick::config::PosTagConfig;
use yellowbrick::plot::Artist;
use yellowbrick::text::{postag, PosTagVisualizer, TaggedDocument};
use yellowbrick::{Visualize, YellowbrickError};

use common::labels;

fn tagged(sentences: &[&[(&str, &str)]]) -> TaggedDocument {
    sentences
        .iter()
        .map(|sentence| {
            sentence
                .iter()
                .map(|(token, tag)| (token.to_string(), tag.to_string()))
                .collect()
        })
        .collect()
}

fn corpus() -> Vec<TaggedDocument> {
    vec![
        tagged(&[&[
            ("All", "PDT"),
            ("the", "DT"),
            ("dogs", "NNS"),
            ("bark", "VBP"),
            (".", "."),
        ]]),
        tagged(&[
            &[("It", "PRP"), ("rains", "VBZ")],
            &[("Quickly", "RB"), ("!", ".")],
        ]),
    ]
}

#[test]
fn test_quick_method_draws_one_bar_series() {
    let ax = postag(&corpus(), None, &PosTagConfig::default()).unwrap();
    let bars: Vec<_> = ax
        .snapshot()
        .artists
        .into_iter()
        .filter_map(|a| match a {
            Artist::Bars(bars) => Some(bars),
            _ => None,
        })
        .collect();
    assert_eq!(bars.len(), 1);
    // noun, verb, adjective, adverb, preposition, determiner
    assert_eq!(&bars[0].heights[..6], &[1.0, 2.0, 0.0, 1.0, 0.0, 2.0]);
    assert_eq!(bars[0].colors.len(), 20);
}

#[test]
fn test_stacked_poof_title_counts_all_tokens() {
    let config = PosTagConfig {
        stack: true,
        colormap: Some("Set1".into()),
        ..Default::default()
    };
    let mut viz = PosTagVisualizer::new(&config).unwrap();
    viz.fit(&corpus(), Some(labels(&["dogs", "weather"]).as_slice())).unwrap();
    viz.finalize().unwrap();

    assert_eq!(viz.count("dogs", "determiner"), Some(2));
    assert_eq!(viz.count("weather", "pronoun"), Some(1));
    let state = viz.ax().snapshot();
    assert_eq!(state.title.as_deref(), Some("PosTag plot for 9-token corpus"));
    // stacked charts keep the tick rotation from the bar stack
    assert_eq!(state.xticks.unwrap().rotation, 90.0);
    assert!(state.legend.is_some());
}

#[test]
fn test_stack_without_y_fails() {
    let config = PosTagConfig {
        stack: true,
        ..Default::default()
    };
    let mut viz = PosTagVisualizer::new(&config).unwrap();
    let err = viz.fit(&corpus(), None).err().unwrap();
    assert!(matches!(err, YellowbrickError::Validation(_)));
}

#[test]
fn test_invalid_tagset_lists_choices() {
    let config = PosTagConfig {
        tagset: "brown".into(),
        ..Default::default()
    };
    let err = PosTagVisualizer::new(&config).err().unwrap();
    assert_eq!(
        err.to_string(),
        "'brown' is an invalid tagset. Please choose one of penn_treebank, universal."
    );
}

use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;

use crate::base::{ScoreVisualizer, Visualize, Visualizer};
use crate::config::{ClassificationReportConfig, Support};
use crate::error::{Result, YellowbrickError};
use crate::estimator::Estimator;
use crate::metrics::precision_recall_fscore_support;
use crate::model_selection::train_test_split;
use crate::plot::{find_text_color, Axes, ColorMesh, Colormap, Rgb};

pub const CMAP_UNDERCOLOR: Rgb = Rgb::WHITE;
pub const CMAP_OVERCOLOR: Rgb = Rgb(0x2a, 0x7d, 0x4f);

/// Columns of the classification report, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Precision,
    Recall,
    F1,
    Support,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Precision, Metric::Recall, Metric::F1, Metric::Support];

    pub fn key(&self) -> &'static str {
        match self {
            Metric::Precision => "precision",
            Metric::Recall => "recall",
            Metric::F1 => "f1",
            Metric::Support => "support",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Metric name -> class name -> value.
pub type ReportScores = BTreeMap<Metric, BTreeMap<String, f64>>;

/// Heatmap of per-class precision, recall, F1 and (optionally) support.
///
/// # Example
///
/// ```no_run
/// use yellowbrick::prelude::*;
/// # fn run(x_train: ndarray::Array2<f64>, y_train: Vec<String>,
/// #        x_test: ndarray::Array2<f64>, y_test: Vec<String>) -> yellowbrick::Result<()> {
/// let mut viz = ClassificationReport::new(NearestCentroid::new(), &ClassificationReportConfig::default())?;
/// viz.fit(&x_train, Some(y_train.as_slice()))?;
/// viz.score(&x_test, &y_test)?;
/// viz.poof(None, false)?;
/// # Ok(())
/// # }
/// ```
pub struct ClassificationReport<E> {
    inner: ScoreVisualizer<E>,
    cmap: Colormap,
    support: Support,
    displayed: Vec<Metric>,
    scores: Option<ReportScores>,
    support_counts: Vec<usize>,
    score: Option<f64>,
}

impl<E: Estimator> ClassificationReport<E> {
    /// Build the report, validating the support mode and colormap up front.
    pub fn new(estimator: E, config: &ClassificationReportConfig) -> Result<Self> {
        let support = Support::resolve(config.support.as_ref())?;
        let cmap = Colormap::from_name(&config.cmap)?
            .with_under(CMAP_UNDERCOLOR)
            .with_over(CMAP_OVERCOLOR);
        let displayed = Metric::ALL
            .into_iter()
            .filter(|m| *m != Metric::Support || support.is_displayed())
            .collect();

        let inner = ScoreVisualizer::new(estimator, config.classes.clone(), config.is_fitted)
            .with_visualizer(Visualizer::from_config(&config.base));

        Ok(Self {
            inner,
            cmap,
            support,
            displayed,
            scores: None,
            support_counts: Vec::new(),
            score: None,
        })
    }

    pub fn with_ax(mut self, ax: Axes) -> Self {
        self.inner.visualizer_mut().set_ax(ax);
        self
    }

    pub fn support(&self) -> Support {
        self.support
    }

    pub fn displayed_metrics(&self) -> &[Metric] {
        &self.displayed
    }

    pub fn classes(&self) -> &[String] {
        self.inner.classes()
    }

    pub fn estimator(&self) -> &E {
        self.inner.estimator()
    }

    /// Scores computed by the last `score` call.
    pub fn scores(&self) -> Option<&ReportScores> {
        self.scores.as_ref()
    }

    /// Raw support counts from the last `score` call, one per class.
    pub fn support_counts(&self) -> &[usize] {
        &self.support_counts
    }

    /// The estimator's score from the last `score` call.
    pub fn last_score(&self) -> Option<f64> {
        self.score
    }

    /// Compute the report on `(x, y)`, draw it and return the estimator's score.
    pub fn score(&mut self, x: &Array2<f64>, y: &[String]) -> Result<f64> {
        let y_pred = self.inner.predict(x)?;
        let computed = precision_recall_fscore_support(y, &y_pred)?;

        let total: usize = computed.support.iter().sum();
        let fractions: Vec<f64> = computed
            .support
            .iter()
            .map(|&s| if total == 0 { 0.0 } else { s as f64 / total as f64 })
            .collect();

        let columns = [
            (Metric::Precision, &computed.precision),
            (Metric::Recall, &computed.recall),
            (Metric::F1, &computed.f1),
            (Metric::Support, &fractions),
        ];
        let mut scores = ReportScores::new();
        for (metric, values) in columns {
            if !self.displayed.contains(&metric) {
                continue;
            }
            let per_label = computed.labels.iter().cloned().zip(values.iter().copied()).collect();
            scores.insert(metric, per_label);
        }
        log::trace!("{} classification report scores: {:?}", self.name(), scores);

        // classes missing from (y, y_pred) have no support
        self.support_counts = self
            .inner
            .classes()
            .iter()
            .map(|class| {
                computed
                    .labels
                    .iter()
                    .position(|label| label == class)
                    .map_or(0, |i| computed.support[i])
            })
            .collect();
        self.scores = Some(scores);
        self.draw()?;

        let score = self.inner.score(x, y)?;
        self.score = Some(score);
        Ok(score)
    }

    fn table(&self, scores: &ReportScores) -> Vec<Vec<f64>> {
        self.inner
            .classes()
            .iter()
            .map(|class| {
                self.displayed
                    .iter()
                    .map(|metric| {
                        scores
                            .get(metric)
                            .and_then(|by_class| by_class.get(class))
                            .copied()
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect()
    }
}

impl<E: Estimator> Visualize for ClassificationReport<E> {
    type Input = Array2<f64>;

    fn visualizer(&self) -> &Visualizer {
        self.inner.visualizer()
    }

    fn visualizer_mut(&mut self) -> &mut Visualizer {
        self.inner.visualizer_mut()
    }

    fn name(&self) -> String {
        self.inner.name()
    }

    fn fit(&mut self, x: &Array2<f64>, y: Option<&[String]>) -> Result<&mut Self> {
        self.inner.fit(x, y)?;
        Ok(self)
    }

    fn draw(&mut self) -> Result<Axes> {
        let scores = self.scores.as_ref().ok_or_else(|| {
            YellowbrickError::Validation("call score() before drawing a classification report".to_string())
        })?;
        let table = self.table(scores);
        let ax = self.ax();

        let n_classes = table.len();
        ax.set_ylim(0.0, n_classes as f64);
        ax.set_xlim(0.0, self.displayed.len() as f64);

        for (row, values) in table.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                let label = match self.displayed[col] {
                    Metric::Support if self.support != Support::Percent => self
                        .support_counts
                        .get(row)
                        .map(|count| count.to_string())
                        .unwrap_or_default(),
                    _ => format!("{:.3}", value),
                };
                let text_color = find_text_color(self.cmap.color(value));
                ax.text(col as f64 + 0.5, row as f64 + 0.5, label, text_color);
            }
        }

        ax.pcolormesh(ColorMesh {
            values: table,
            vmin: 0.0,
            vmax: 1.0,
            cmap: self.cmap.clone(),
            edge_color: Some(Rgb::WHITE),
        });
        ax.colorbar();
        Ok(ax)
    }

    fn finalize(&mut self) -> Result<Axes> {
        let title = format!("{} Classification Report", self.name());
        self.visualizer_mut().set_title(&title);

        let ax = self.ax();
        let metrics = &self.displayed;
        ax.set_xticks(
            (0..metrics.len()).map(|i| i as f64 + 0.5).collect(),
            metrics.iter().map(|m| m.key().to_string()).collect(),
            45.0,
        );
        let classes = self.inner.classes();
        ax.set_yticks(
            (0..classes.len()).map(|i| i as f64 + 0.5).collect(),
            classes.to_vec(),
            0.0,
        );
        ax.figure().tight_layout();
        Ok(ax)
    }
}

/// Fit on 80% of `(x, y)`, score on the rest and return the finalized report.
pub fn classification_report<E: Estimator>(
    model: E,
    x: &Array2<f64>,
    y: &[String],
    config: &ClassificationReportConfig,
    random_state: Option<u64>,
) -> Result<ClassificationReport<E>> {
    let mut viz = ClassificationReport::new(model, config)?;
    let split = train_test_split(x, y, 0.2, random_state)?;
    viz.fit(&split.x_train, Some(split.y_train.as_slice()))?;
    viz.score(&split.x_test, &split.y_test)?;
    viz.finalize()?;
    Ok(viz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitState;
    use crate::estimator::NearestCentroid;
    use crate::plot::Artist;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn fitted_model() -> NearestCentroid {
        let x = Array2::from_shape_vec((3, 1), vec![0.0, 10.0, 20.0]).unwrap();
        let mut model = NearestCentroid::new();
        model.fit(&x, &labels(&["a", "b", "c"])).unwrap();
        model
    }

    fn test_data() -> (Array2<f64>, Vec<String>) {
        let x = Array2::from_shape_vec((6, 1), vec![0.0, 1.0, 10.0, 9.0, 20.0, 11.0]).unwrap();
        // predicted: a a b b c b
        (x, labels(&["a", "b", "b", "b", "c", "c"]))
    }

    fn config(support: Option<&str>) -> ClassificationReportConfig {
        ClassificationReportConfig {
            support: support.map(Into::into),
            is_fitted: FitState::Fitted,
            ..Default::default()
        }
    }

    #[test]
    fn test_scores_and_support_counts() {
        let (x, y) = test_data();
        let mut viz = ClassificationReport::new(fitted_model(), &config(Some("count"))).unwrap();
        viz.fit(&x, Some(y.as_slice())).unwrap();
        let score = viz.score(&x, &y).unwrap();

        assert!((score - 4.0 / 6.0).abs() < 1e-12);
        let scores = viz.scores().unwrap();
        assert_eq!(scores[&Metric::Precision]["a"], 0.5);
        assert_eq!(scores[&Metric::Recall]["a"], 1.0);
        assert_eq!(scores[&Metric::Precision]["c"], 1.0);
        assert!((scores[&Metric::Support]["b"] - 0.5).abs() < 1e-12);
        assert_eq!(viz.support_counts(), &[1, 3, 2]);

        // support column shows raw counts
        let texts: Vec<String> = viz
            .ax()
            .snapshot()
            .artists
            .iter()
            .filter_map(|a| match a {
                Artist::Text(t) if t.x == 3.5 => Some(t.text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, labels(&["1", "3", "2"]));
    }

    #[test]
    fn test_scores_follow_labels_not_positions() {
        let (x, y) = test_data();
        let mut viz = ClassificationReport::new(fitted_model(), &config(Some("count"))).unwrap();
        viz.fit(&x, Some(y.as_slice())).unwrap();
        assert_eq!(viz.classes(), labels(&["a", "b", "c"]).as_slice());

        // no "a" in this split; predicted: b b c b
        let x_test = Array2::from_shape_vec((4, 1), vec![10.0, 11.0, 20.0, 9.0]).unwrap();
        let y_test = labels(&["b", "b", "c", "c"]);
        viz.score(&x_test, &y_test).unwrap();

        let scores = viz.scores().unwrap();
        assert!(!scores[&Metric::Precision].contains_key("a"));
        assert!((scores[&Metric::Precision]["b"] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(scores[&Metric::Precision]["c"], 1.0);
        assert_eq!(scores[&Metric::Recall]["c"], 0.5);
        assert_eq!(viz.support_counts(), &[0, 2, 2]);

        let mesh = viz
            .ax()
            .snapshot()
            .artists
            .into_iter()
            .find_map(|a| match a {
                Artist::Mesh(m) => Some(m),
                _ => None,
            })
            .unwrap();
        assert_eq!(mesh.values[0][..3], [0.0, 0.0, 0.0]);
        assert!((mesh.values[1][0] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(mesh.values[2][0], 1.0);
    }

    #[test]
    fn test_percent_support_shows_fractions() {
        let (x, y) = test_data();
        let mut viz = ClassificationReport::new(fitted_model(), &config(Some("percent"))).unwrap();
        viz.fit(&x, Some(y.as_slice())).unwrap();
        viz.score(&x, &y).unwrap();

        let state = viz.ax().snapshot();
        assert!(state
            .artists
            .iter()
            .any(|a| matches!(a, Artist::Text(t) if t.x == 3.5 && t.text == "0.500")));
    }

    #[test]
    fn test_hidden_support_drops_column() {
        let (x, y) = test_data();
        let mut viz = ClassificationReport::new(fitted_model(), &config(None)).unwrap();
        assert_eq!(viz.displayed_metrics(), &[Metric::Precision, Metric::Recall, Metric::F1]);
        viz.fit(&x, Some(y.as_slice())).unwrap();
        viz.score(&x, &y).unwrap();

        assert!(!viz.scores().unwrap().contains_key(&Metric::Support));
        let state = viz.ax().snapshot();
        let mesh = state
            .artists
            .iter()
            .find_map(|a| match a {
                Artist::Mesh(m) => Some(m.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(mesh.values.len(), 3);
        assert_eq!(mesh.values[0].len(), 3);
        assert!(state.colorbar);
    }

    #[test]
    fn test_finalize_sets_title_and_ticks() {
        let (x, y) = test_data();
        let mut viz = ClassificationReport::new(fitted_model(), &config(Some("count"))).unwrap();
        viz.fit(&x, Some(y.as_slice())).unwrap();
        viz.score(&x, &y).unwrap();
        viz.finalize().unwrap();

        let state = viz.ax().snapshot();
        assert_eq!(state.title.as_deref(), Some("NearestCentroid Classification Report"));
        let xticks = state.xticks.unwrap();
        assert_eq!(xticks.positions, vec![0.5, 1.5, 2.5, 3.5]);
        assert_eq!(xticks.rotation, 45.0);
        assert_eq!(state.yticks.unwrap().labels, labels(&["a", "b", "c"]));
        assert!(viz.ax().figure().is_tight_layout());
    }

    #[test]
    fn test_invalid_options_fail_at_construction() {
        assert!(matches!(
            ClassificationReport::new(NearestCentroid::new(), &config(Some("invalid"))),
            Err(YellowbrickError::Validation(_))
        ));
        let bad_cmap = ClassificationReportConfig {
            cmap: "NotAColormap".to_string(),
            ..Default::default()
        };
        assert!(ClassificationReport::new(NearestCentroid::new(), &bad_cmap).is_err());
    }

    #[test]
    fn test_draw_before_score_is_an_error() {
        let mut viz = ClassificationReport::new(NearestCentroid::new(), &config(None)).unwrap();
        assert!(matches!(viz.draw(), Err(YellowbrickError::Validation(_))));
    }
}

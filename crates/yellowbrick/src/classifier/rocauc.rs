use ndarray::{Array2, Axis};

use crate::base::{ScoreVisualizer, Visualize, Visualizer};
use crate::config::RocAucConfig;
use crate::error::{Result, YellowbrickError};
use crate::estimator::Estimator;
use crate::metrics::{auc, interp, label_binarize, roc_curve, unique_labels};
use crate::model_selection::train_test_split;
use crate::plot::colors::LINE_COLOR;
use crate::plot::{resolve_colors, Axes, LegendLoc, LineStyle};

/// One ROC curve and the area beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Positive label the curve was computed for, or the average's name.
    pub label: String,
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub auc: f64,
}

impl Curve {
    fn compute(label: impl Into<String>, truth: &[bool], scores: &[f64]) -> Result<Self> {
        let roc = roc_curve(truth, scores)?;
        let area = auc(&roc.fpr, &roc.tpr)?;
        Ok(Self {
            label: label.into(),
            fpr: roc.fpr,
            tpr: roc.tpr,
            auc: area,
        })
    }
}

/// Every curve computed by the last `score` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RocCurves {
    /// Set when the estimator only exposes a single-column decision function.
    pub binary: Option<Curve>,
    /// One-vs-rest curves, in sorted label order.
    pub per_class: Vec<Curve>,
    pub micro: Option<Curve>,
    pub macro_average: Option<Curve>,
}

/// Receiver operating characteristic curves with their AUC.
pub struct RocAuc<E> {
    inner: ScoreVisualizer<E>,
    micro: bool,
    macro_average: bool,
    per_class: bool,
    curves: Option<RocCurves>,
    score: Option<f64>,
}

impl<E: Estimator> RocAuc<E> {
    pub fn new(estimator: E, config: &RocAucConfig) -> Self {
        let inner = ScoreVisualizer::new(estimator, config.classes.clone(), config.is_fitted)
            .with_visualizer(Visualizer::from_config(&config.base));
        Self {
            inner,
            micro: config.micro,
            macro_average: config.macro_average,
            per_class: config.per_class,
            curves: None,
            score: None,
        }
    }

    pub fn with_ax(mut self, ax: Axes) -> Self {
        self.inner.visualizer_mut().set_ax(ax);
        self
    }

    pub fn classes(&self) -> &[String] {
        self.inner.classes()
    }

    pub fn curves(&self) -> Option<&RocCurves> {
        self.curves.as_ref()
    }

    pub fn last_score(&self) -> Option<f64> {
        self.score
    }

    fn y_scores(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let estimator = self.inner.estimator();
        match estimator.predict_proba(x) {
            Err(YellowbrickError::Unsupported(_)) => {}
            other => return other,
        }
        match estimator.decision_function(x) {
            Err(YellowbrickError::Unsupported(_)) => Err(YellowbrickError::Model(
                "ROCAUC requires estimators with predict_proba or decision_function methods."
                    .to_string(),
            )),
            other => other,
        }
    }

    /// Score column of each class: its position in the estimator's classes
    /// when known, else its position in `classes`.
    fn score_columns(&self, classes: &[String], ncols: usize) -> Result<Vec<usize>> {
        let known = self.inner.estimator().classes();
        classes
            .iter()
            .enumerate()
            .map(|(i, class)| {
                let col = known
                    .as_ref()
                    .and_then(|known| known.iter().position(|c| c == class))
                    .unwrap_or(i);
                if col < ncols {
                    Ok(col)
                } else {
                    Err(YellowbrickError::Shape(format!(
                        "estimator returned {} score columns, none for class '{}'",
                        ncols, class
                    )))
                }
            })
            .collect()
    }

    /// Compute the curves on `(x, y)` and draw them.
    ///
    /// Returns the micro-average AUC if requested, else the macro-average
    /// AUC if requested, else the estimator's own score.
    pub fn score(&mut self, x: &Array2<f64>, y: &[String]) -> Result<f64> {
        let y_scores = self.y_scores(x)?;
        if y_scores.nrows() != y.len() {
            return Err(YellowbrickError::Shape(format!(
                "estimator returned {} score rows for {} samples",
                y_scores.nrows(),
                y.len()
            )));
        }

        let binary_decision = y_scores.ncols() == 1;
        if binary_decision && (self.micro || self.macro_average || self.per_class) {
            return Err(YellowbrickError::Model(
                "Micro, macro, and per-class scores are not defined for binary classification \
                 for estimators with only decision_function methods; set micro, macro, and \
                 per-class params to False."
                    .to_string(),
            ));
        }
        if !binary_decision && !(self.micro || self.macro_average || self.per_class) {
            return Err(YellowbrickError::Validation(
                "no curves will be drawn; specify micro, macro, or per_class".to_string(),
            ));
        }

        let classes = unique_labels(y);
        let mut curves = RocCurves::default();

        if binary_decision {
            if classes.len() != 2 {
                return Err(YellowbrickError::Validation(format!(
                    "a binary decision function needs exactly 2 classes, found {}",
                    classes.len()
                )));
            }
            let positive = &classes[1];
            let truth: Vec<bool> = y.iter().map(|label| label == positive).collect();
            let scores = y_scores.column(0).to_vec();
            curves.binary = Some(Curve::compute(positive.clone(), &truth, &scores)?);
        } else {
            let columns = self.score_columns(&classes, y_scores.ncols())?;
            for (class, &col) in classes.iter().zip(&columns) {
                let truth: Vec<bool> = y.iter().map(|label| label == class).collect();
                let scores = y_scores.column(col).to_vec();
                curves.per_class.push(Curve::compute(class.clone(), &truth, &scores)?);
            }
            if self.micro {
                let selected = y_scores.select(Axis(1), &columns);
                curves.micro = Some(micro_average(y, &selected, &classes)?);
            }
            if self.macro_average {
                curves.macro_average = Some(macro_average(&curves.per_class)?);
            }
        }

        for curve in curves.per_class.iter().chain(&curves.micro).chain(&curves.macro_average) {
            log::trace!("ROC AUC for {}: {:.4}", curve.label, curve.auc);
        }
        self.curves = Some(curves);
        self.draw()?;

        let score = match self.curves.as_ref() {
            Some(RocCurves { micro: Some(micro), .. }) if self.micro => micro.auc,
            Some(RocCurves { macro_average: Some(avg), .. }) if self.macro_average => avg.auc,
            _ => self.inner.score(x, y)?,
        };
        self.score = Some(score);
        Ok(score)
    }
}

/// Pool every (sample, class) decision into one curve. `y_scores` has one
/// column per entry of `classes`.
fn micro_average(y: &[String], y_scores: &Array2<f64>, classes: &[String]) -> Result<Curve> {
    let truth: Vec<bool> = label_binarize(y, classes).iter().map(|&v| v == 1.0).collect();
    let scores: Vec<f64> = y_scores.iter().copied().collect();
    Curve::compute("micro", &truth, &scores)
}

/// Average the per-class TPRs on the union of their FPRs.
fn macro_average(per_class: &[Curve]) -> Result<Curve> {
    let mut all_fpr: Vec<f64> = per_class.iter().flat_map(|c| c.fpr.iter().copied()).collect();
    all_fpr.sort_by(f64::total_cmp);
    all_fpr.dedup();

    let mut avg_tpr = vec![0.0; all_fpr.len()];
    for curve in per_class {
        for (acc, v) in avg_tpr.iter_mut().zip(interp(&all_fpr, &curve.fpr, &curve.tpr)) {
            *acc += v;
        }
    }
    let n = per_class.len().max(1) as f64;
    avg_tpr.iter_mut().for_each(|v| *v /= n);

    let area = auc(&all_fpr, &avg_tpr)?;
    Ok(Curve {
        label: "macro".to_string(),
        fpr: all_fpr,
        tpr: avg_tpr,
        auc: area,
    })
}

impl<E: Estimator> Visualize for RocAuc<E> {
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
        let curves = self.curves.clone().ok_or_else(|| {
            YellowbrickError::Validation("call score() before drawing ROC curves".to_string())
        })?;
        let classes = self.inner.classes().to_vec();
        let ax = self.ax();

        let colors = resolve_colors(classes.len().max(curves.per_class.len()).max(1), None, None)?;
        let average_color = colors.last().copied();

        if let Some(curve) = curves.binary {
            ax.plot(
                curve.fpr,
                curve.tpr,
                None,
                LineStyle::Solid,
                Some(format!("ROC for binary decision, AUC = {:.2}", curve.auc)),
            );
        }

        if self.per_class {
            for (i, curve) in curves.per_class.into_iter().enumerate() {
                let name = classes.get(i).cloned().unwrap_or(curve.label);
                ax.plot(
                    curve.fpr,
                    curve.tpr,
                    colors.get(i).copied(),
                    LineStyle::Solid,
                    Some(format!("ROC of class {}, AUC = {:.2}", name, curve.auc)),
                );
            }
        }

        let averages = [("micro", curves.micro), ("macro", curves.macro_average)];
        for (kind, curve) in averages {
            if let Some(curve) = curve {
                ax.plot(
                    curve.fpr,
                    curve.tpr,
                    average_color,
                    LineStyle::Dashed,
                    Some(format!("{}-average ROC curve, AUC = {:.2}", kind, curve.auc)),
                );
            }
        }

        ax.plot(vec![0.0, 1.0], vec![0.0, 1.0], Some(LINE_COLOR), LineStyle::Dotted, None);
        Ok(ax)
    }

    fn finalize(&mut self) -> Result<Axes> {
        let title = format!("ROC Curves for {}", self.name());
        self.visualizer_mut().set_title(&title);

        let ax = self.ax();
        ax.legend(LegendLoc::LowerRight);
        ax.set_xlim(0.0, 1.0);
        ax.set_ylim(0.0, 1.0);
        ax.set_ylabel("True Positive Rate");
        ax.set_xlabel("False Positive Rate");
        Ok(ax)
    }
}

/// Fit on 80% of `(x, y)`, score on the rest and return the finalized chart.
pub fn roc_auc<E: Estimator>(
    model: E,
    x: &Array2<f64>,
    y: &[String],
    config: &RocAucConfig,
    random_state: Option<u64>,
) -> Result<RocAuc<E>> {
    let mut viz = RocAuc::new(model, config);
    let split = train_test_split(x, y, 0.2, random_state)?;
    viz.fit(&split.x_train, Some(split.y_train.as_slice()))?;
    viz.score(&split.x_test, &split.y_test)?;
    viz.finalize()?;
    Ok(viz)
}

#[cfg(test)]
mod tests {
    use ndarray::s;

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

    fn separable() -> (Array2<f64>, Vec<String>) {
        let x = Array2::from_shape_vec((6, 1), vec![0.0, 1.0, 10.0, 11.0, 20.0, 19.0]).unwrap();
        (x, labels(&["a", "a", "b", "b", "c", "c"]))
    }

    /// Sign of the single feature, exposed only as a decision function.
    struct Threshold;

    impl Estimator for Threshold {
        fn fit(&mut self, _x: &Array2<f64>, _y: &[String]) -> Result<()> {
            Ok(())
        }

        fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>> {
            Ok(x.column(0)
                .iter()
                .map(|&v| if v > 0.0 { "pos" } else { "neg" }.to_string())
                .collect())
        }

        fn decision_function(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
            Ok(x.slice(s![.., 0..1]).to_owned())
        }
    }

    struct NoScores;

    impl Estimator for NoScores {
        fn fit(&mut self, _x: &Array2<f64>, _y: &[String]) -> Result<()> {
            Ok(())
        }

        fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>> {
            Ok(vec!["a".to_string(); x.nrows()])
        }
    }

    fn fitted_config() -> RocAucConfig {
        RocAucConfig {
            is_fitted: FitState::Fitted,
            ..Default::default()
        }
    }

    #[test]
    fn test_perfect_ranking_has_unit_auc() {
        let (x, y) = separable();
        let mut viz = RocAuc::new(fitted_model(), &fitted_config());
        viz.fit(&x, Some(y.as_slice())).unwrap();
        let score = viz.score(&x, &y).unwrap();

        assert!((score - 1.0).abs() < 1e-12);
        let curves = viz.curves().unwrap();
        assert_eq!(curves.per_class.len(), 3);
        for curve in &curves.per_class {
            assert!((curve.auc - 1.0).abs() < 1e-12);
        }
        assert!((curves.macro_average.as_ref().unwrap().auc - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_macro_average_starts_at_full_recall() {
        let (x, y) = separable();
        let config = RocAucConfig {
            micro: false,
            ..fitted_config()
        };
        let mut viz = RocAuc::new(fitted_model(), &config);
        viz.fit(&x, Some(y.as_slice())).unwrap();
        let score = viz.score(&x, &y).unwrap();

        let macro_curve = viz.curves().unwrap().macro_average.clone().unwrap();
        assert_eq!(macro_curve.fpr[0], 0.0);
        assert_eq!(macro_curve.tpr[0], 1.0);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_draws_one_line_per_curve_plus_diagonal() {
        let (x, y) = separable();
        let mut viz = RocAuc::new(fitted_model(), &fitted_config());
        viz.fit(&x, Some(y.as_slice())).unwrap();
        viz.score(&x, &y).unwrap();
        viz.finalize().unwrap();

        let state = viz.ax().snapshot();
        let lines: Vec<_> = state
            .artists
            .iter()
            .filter_map(|a| match a {
                Artist::Line(line) => Some(line),
                _ => None,
            })
            .collect();
        // 3 classes, micro, macro, diagonal
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].label.as_deref(), Some("ROC of class a, AUC = 1.00"));
        assert_eq!(lines[3].style, LineStyle::Dashed);
        assert_eq!(lines[5].style, LineStyle::Dotted);
        assert_eq!(state.title.as_deref(), Some("ROC Curves for NearestCentroid"));
        assert_eq!(state.legend, Some(LegendLoc::LowerRight));
        assert_eq!(state.xlim, Some((0.0, 1.0)));
    }

    #[test]
    fn test_score_falls_back_to_estimator_score() {
        let (x, y) = separable();
        let config = RocAucConfig {
            micro: false,
            macro_average: false,
            ..fitted_config()
        };
        let mut viz = RocAuc::new(fitted_model(), &config);
        viz.fit(&x, Some(y.as_slice())).unwrap();
        assert_eq!(viz.score(&x, &y).unwrap(), 1.0);
        assert!(viz.curves().unwrap().micro.is_none());
    }

    #[test]
    fn test_binary_decision_requires_all_flags_off() {
        let x = Array2::from_shape_vec((4, 1), vec![-2.0, -1.0, 1.0, 2.0]).unwrap();
        let y = labels(&["neg", "neg", "pos", "pos"]);

        let mut viz = RocAuc::new(Threshold, &fitted_config());
        assert!(matches!(viz.score(&x, &y), Err(YellowbrickError::Model(_))));

        let config = RocAucConfig {
            micro: false,
            macro_average: false,
            per_class: false,
            ..fitted_config()
        };
        let mut viz = RocAuc::new(Threshold, &config);
        let score = viz.score(&x, &y).unwrap();
        assert_eq!(score, 1.0);
        let binary = viz.curves().unwrap().binary.as_ref().unwrap();
        assert_eq!(binary.label, "pos");
        assert_eq!(binary.auc, 1.0);
    }

    #[test]
    fn test_no_curves_requested_is_validation_error() {
        let (x, y) = separable();
        let config = RocAucConfig {
            micro: false,
            macro_average: false,
            per_class: false,
            ..fitted_config()
        };
        let mut viz = RocAuc::new(fitted_model(), &config);
        assert!(matches!(viz.score(&x, &y), Err(YellowbrickError::Validation(_))));
    }

    #[test]
    fn test_estimator_without_scores_is_model_error() {
        let (x, y) = separable();
        let mut viz = RocAuc::new(NoScores, &fitted_config());
        assert!(matches!(viz.score(&x, &y), Err(YellowbrickError::Model(_))));
    }
}

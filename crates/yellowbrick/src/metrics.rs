//! Classification metrics used by the score visualizers.

use ndarray::Array2;

use crate::error::{Result, YellowbrickError};

/// Sorted, de-duplicated labels.
pub fn unique_labels(y: &[String]) -> Vec<String> {
    let mut labels = y.to_vec();
    labels.sort();
    labels.dedup();
    labels
}

fn check_lengths(y_true: usize, y_pred: usize) -> Result<()> {
    if y_true != y_pred {
        return Err(YellowbrickError::Shape(format!(
            "found inconsistent numbers of samples: {} and {}",
            y_true, y_pred
        )));
    }
    Ok(())
}

/// Fraction of predictions that match the true labels.
pub fn accuracy_score(y_true: &[String], y_pred: &[String]) -> Result<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    if y_true.is_empty() {
        return Err(YellowbrickError::Shape("accuracy of an empty sample".to_string()));
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Per-class precision, recall, F1 and support.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassScores {
    /// Sorted union of the true and predicted labels.
    pub labels: Vec<String>,
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
    pub support: Vec<usize>,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Compute precision, recall, F1 and support for every label.
///
/// Ill-defined ratios (no predicted or no true samples for a label) are 0.
pub fn precision_recall_fscore_support(y_true: &[String], y_pred: &[String]) -> Result<ClassScores> {
    check_lengths(y_true.len(), y_pred.len())?;

    let mut all = y_true.to_vec();
    all.extend_from_slice(y_pred);
    let labels = unique_labels(&all);

    let n = labels.len();
    let mut tp = vec![0usize; n];
    let mut pred_count = vec![0usize; n];
    let mut true_count = vec![0usize; n];
    let index = |label: &String| labels.binary_search(label).ok();

    for (t, p) in y_true.iter().zip(y_pred) {
        if let (Some(ti), Some(pi)) = (index(t), index(p)) {
            true_count[ti] += 1;
            pred_count[pi] += 1;
            if ti == pi {
                tp[ti] += 1;
            }
        }
    }

    let precision: Vec<f64> = (0..n).map(|i| ratio(tp[i], pred_count[i])).collect();
    let recall: Vec<f64> = (0..n).map(|i| ratio(tp[i], true_count[i])).collect();
    let f1 = precision
        .iter()
        .zip(&recall)
        .map(|(p, r)| if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) })
        .collect();

    Ok(ClassScores {
        labels,
        precision,
        recall,
        f1,
        support: true_count,
    })
}

/// One-hot encode `y` against `classes`, one column per class.
pub fn label_binarize(y: &[String], classes: &[String]) -> Array2<f64> {
    let mut out = Array2::zeros((y.len(), classes.len()));
    for (i, label) in y.iter().enumerate() {
        if let Some(k) = classes.iter().position(|c| c == label) {
            out[[i, k]] = 1.0;
        }
    }
    out
}

/// Receiver operating characteristic points, ordered by increasing FPR.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

/// Compute the ROC curve of binary targets against scores.
pub fn roc_curve(y_true: &[bool], y_score: &[f64]) -> Result<RocCurve> {
    check_lengths(y_true.len(), y_score.len())?;

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| y_score[b].total_cmp(&y_score[a]));

    let mut fps = vec![0.0];
    let mut tps = vec![0.0];
    let mut thresholds = vec![f64::INFINITY];
    let (mut tp, mut fp) = (0.0, 0.0);

    for (pos, &i) in order.iter().enumerate() {
        if y_true[i] {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        let last_of_value = order
            .get(pos + 1)
            .map_or(true, |&next| y_score[next] != y_score[i]);
        if last_of_value {
            tps.push(tp);
            fps.push(fp);
            thresholds.push(y_score[i]);
        }
    }

    if tp == 0.0 || fp == 0.0 {
        return Err(YellowbrickError::Validation(
            "ROC curves need both positive and negative samples".to_string(),
        ));
    }

    Ok(RocCurve {
        fpr: fps.iter().map(|v| v / fp).collect(),
        tpr: tps.iter().map(|v| v / tp).collect(),
        thresholds,
    })
}

/// Area under a curve with the trapezoidal rule. `x` must be monotonic.
pub fn auc(x: &[f64], y: &[f64]) -> Result<f64> {
    check_lengths(x.len(), y.len())?;
    if x.len() < 2 {
        return Err(YellowbrickError::Validation(
            "at least 2 points are needed to compute area under curve".to_string(),
        ));
    }
    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (xw[1] - xw[0]) * (yw[0] + yw[1]) / 2.0)
        .sum();
    Ok(area.abs())
}

/// Piecewise linear interpolation of `(xp, fp)` at `x`, clamped at the ends.
///
/// Where `xp` repeats a value, a query at exactly that value takes the last
/// matching `fp`.
pub fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    x.iter()
        .map(|&v| {
            if xp.is_empty() {
                return f64::NAN;
            }
            if v < xp[0] {
                return fp[0];
            }
            let last = xp.len() - 1;
            if v >= xp[last] {
                return fp[last];
            }
            let j = xp.partition_point(|p| *p <= v) - 1;
            let t = (v - xp[j]) / (xp[j + 1] - xp[j]);
            fp[j] + t * (fp[j + 1] - fp[j])
        })
        .collect()
}

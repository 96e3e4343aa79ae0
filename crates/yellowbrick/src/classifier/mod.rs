//! Visualizers that evaluate a fitted classifier on held-out data.
pub mod classification_report;
pub mod rocauc;

pub use classification_report::{classification_report, ClassificationReport, Metric};
pub use rocauc::{roc_auc, RocAuc, RocCurves};

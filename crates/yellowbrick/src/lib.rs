//! yellowbrick: diagnostic visualizers for machine-learning estimators.
//!
//! Every chart follows the same fit/draw/finalize/poof lifecycle defined in
//! [`base`]. Model-backed charts ([`classifier`]) wrap any [`Estimator`],
//! text charts ([`text`]) consume pre-tagged corpora, and a
//! [`VisualizerGrid`] lays several charts out on one canvas.
//!
//! Charts are recorded on backend-agnostic [`plot::Figure`]s and rendered
//! with plotly when saved (`.html`, `.json`) or shown.
pub mod base;
pub mod classifier;
pub mod config;
pub mod error;
pub mod estimator;
pub mod grid;
pub mod metrics;
pub mod model_selection;
pub mod plot;
pub mod text;

pub use base::{PoofOutcome, ScoreVisualizer, Visualize, Visualizer};
pub use error::{Result, YellowbrickError, YellowbrickWarning};
pub use estimator::Estimator;
pub use grid::{GridCell, VisualizerGrid};

/// The types needed to build, fit and emit any visualizer.
pub mod prelude {
    pub use crate::base::{PoofOutcome, ScoreVisualizer, Visualize, Visualizer};
    pub use crate::classifier::{classification_report, roc_auc, ClassificationReport, RocAuc};
    pub use crate::config::{
        ClassificationReportConfig, FitState, PosTagConfig, RocAucConfig, Support, Tagset,
        VisualizerConfig,
    };
    pub use crate::error::{Result, YellowbrickError};
    pub use crate::estimator::{Estimator, NearestCentroid};
    pub use crate::grid::{GridCell, VisualizerGrid};
    pub use crate::text::{postag, PosTagVisualizer, TaggedDocument};
}

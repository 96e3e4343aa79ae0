use std::fmt;

use thiserror::Error;

/// Errors raised by visualizers, estimators and rendering backends.
#[derive(Error, Debug)]
pub enum YellowbrickError {
    /// An option value or argument combination was rejected.
    #[error("{0}")]
    Validation(String),
    /// A lifecycle method that must be provided by a concrete visualizer.
    #[error("{0} is not implemented for this visualizer")]
    NotImplemented(&'static str),
    /// The wrapped estimator has not been fitted yet.
    #[error("estimator is not fitted: {0}")]
    NotFitted(String),
    /// The wrapped estimator cannot produce what a visualizer needs.
    #[error("{0}")]
    Model(String),
    /// An optional estimator capability is missing.
    #[error("estimator does not support {0}")]
    Unsupported(&'static str),
    #[error("cannot save figure with format '{0}', use .html or .json")]
    UnsupportedFormat(String),
    #[error("shape mismatch: {0}")]
    Shape(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, YellowbrickError>;

/// Non-fatal conditions reported when a figure is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YellowbrickWarning {
    /// The visualizer never created or received a drawing surface.
    NoAxes(String),
    /// The drawing surface exists but nothing was drawn on it.
    EmptyAxes(String),
}

impl fmt::Display for YellowbrickWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            YellowbrickWarning::NoAxes(name) => write!(
                f,
                "{} does not have a reference to an axes; \
                 call fit() or draw() before poof()",
                name
            ),
            YellowbrickWarning::EmptyAxes(name) => write!(
                f,
                "{} is emitting an empty axes; \
                 did you call fit() or score() before poof()?",
                name
            ),
        }
    }
}

//! The estimator contract consumed by score visualizers.
//!
//! Visualizers never train or evaluate models themselves; they call into an
//! [`Estimator`] implementation. Adapters around concrete ML libraries
//! implement this trait, and [`NearestCentroid`] ships as a small built-in.
pub mod centroid;

use ndarray::{s, Array2};

use crate::error::{Result, YellowbrickError};
use crate::metrics::accuracy_score;

pub use centroid::NearestCentroid;

/// A supervised classifier over dense `f64` features and string labels.
pub trait Estimator {
    fn fit(&mut self, x: &Array2<f64>, y: &[String]) -> Result<()>;

    /// Predict one label per row of `x`. Unfitted estimators return
    /// [`YellowbrickError::NotFitted`].
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>>;

    /// Mean accuracy on the given data.
    fn score(&self, x: &Array2<f64>, y: &[String]) -> Result<f64> {
        let y_pred = self.predict(x)?;
        accuracy_score(y, &y_pred)
    }

    /// Classes discovered during fit, in column order of `predict_proba`.
    fn classes(&self) -> Option<Vec<String>> {
        None
    }

    /// Human readable name used in chart titles.
    fn name(&self) -> String {
        "Estimator".to_string()
    }

    /// Cheap fitted-state introspection. `None` means unknown, in which case
    /// callers fall back to a dry-run prediction.
    fn fitted_hint(&self) -> Option<bool> {
        None
    }

    /// Class probabilities, one column per entry of [`Estimator::classes`].
    fn predict_proba(&self, _x: &Array2<f64>) -> Result<Array2<f64>> {
        Err(YellowbrickError::Unsupported("predict_proba"))
    }

    /// Decision scores. A single column denotes a binary decision.
    fn decision_function(&self, _x: &Array2<f64>) -> Result<Array2<f64>> {
        Err(YellowbrickError::Unsupported("decision_function"))
    }
}

impl<E: Estimator + ?Sized> Estimator for &mut E {
    fn fit(&mut self, x: &Array2<f64>, y: &[String]) -> Result<()> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>> {
        (**self).predict(x)
    }

    fn score(&self, x: &Array2<f64>, y: &[String]) -> Result<f64> {
        (**self).score(x, y)
    }

    fn classes(&self) -> Option<Vec<String>> {
        (**self).classes()
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn fitted_hint(&self) -> Option<bool> {
        (**self).fitted_hint()
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        (**self).predict_proba(x)
    }

    fn decision_function(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        (**self).decision_function(x)
    }
}

impl<E: Estimator + ?Sized> Estimator for Box<E> {
    fn fit(&mut self, x: &Array2<f64>, y: &[String]) -> Result<()> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>> {
        (**self).predict(x)
    }

    fn score(&self, x: &Array2<f64>, y: &[String]) -> Result<f64> {
        (**self).score(x, y)
    }

    fn classes(&self) -> Option<Vec<String>> {
        (**self).classes()
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn fitted_hint(&self) -> Option<bool> {
        (**self).fitted_hint()
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        (**self).predict_proba(x)
    }

    fn decision_function(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        (**self).decision_function(x)
    }
}

/// Decide whether `estimator` is already fitted.
///
/// Uses the estimator's own [`Estimator::fitted_hint`] when it has one,
/// otherwise predicts the first row of `x`: a `NotFitted` error means
/// unfitted, success means fitted, and any other error is returned as is.
pub fn check_fitted<E: Estimator + ?Sized>(estimator: &E, x: &Array2<f64>) -> Result<bool> {
    if let Some(fitted) = estimator.fitted_hint() {
        return Ok(fitted);
    }

    let first_row = x.slice(s![..x.nrows().min(1), ..]).to_owned();
    match estimator.predict(&first_row) {
        Ok(_) => Ok(true),
        Err(YellowbrickError::NotFitted(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubEstimator {
        hint: Option<bool>,
        outcome: fn() -> Result<Vec<String>>,
    }

    impl Estimator for StubEstimator {
        fn fit(&mut self, _x: &Array2<f64>, _y: &[String]) -> Result<()> {
            Ok(())
        }

        fn predict(&self, _x: &Array2<f64>) -> Result<Vec<String>> {
            (self.outcome)()
        }

        fn fitted_hint(&self) -> Option<bool> {
            self.hint
        }
    }

    fn x() -> Array2<f64> {
        Array2::zeros((3, 2))
    }

    #[test]
    fn test_hint_wins_over_dry_run() {
        let stub = StubEstimator {
            hint: Some(false),
            outcome: || Ok(vec!["a".to_string()]),
        };
        assert!(!check_fitted(&stub, &x()).unwrap());
    }

    #[test]
    fn test_dry_run_decides_without_hint() {
        let fitted = StubEstimator {
            hint: None,
            outcome: || Ok(vec!["a".to_string()]),
        };
        assert!(check_fitted(&fitted, &x()).unwrap());

        let unfitted = StubEstimator {
            hint: None,
            outcome: || Err(YellowbrickError::NotFitted("stub".into())),
        };
        assert!(!check_fitted(&unfitted, &x()).unwrap());
    }

    #[test]
    fn test_other_dry_run_errors_propagate() {
        let broken = StubEstimator {
            hint: None,
            outcome: || Err(YellowbrickError::Shape("expected 4 features".into())),
        };
        assert!(matches!(check_fitted(&broken, &x()), Err(YellowbrickError::Shape(_))));
    }
}

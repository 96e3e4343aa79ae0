#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use yellowbrick::estimator::Estimator;
use yellowbrick::plot::{Backend, Figure};
use yellowbrick::{Result, YellowbrickError};

pub fn labels(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Three well separated 1-d blobs centred on 0, 10 and 20, `per_class` rows each.
pub fn blobs(per_class: usize) -> (ndarray::Array2<f64>, Vec<String>) {
    let mut values = Vec::new();
    let mut y = Vec::new();
    for (k, class) in ["a", "b", "c"].iter().enumerate() {
        for j in 0..per_class {
            values.push(10.0 * k as f64 + 0.05 * j as f64);
            y.push(class.to_string());
        }
    }
    let x = ndarray::Array2::from_shape_vec((values.len(), 1), values).expect("blob matrix");
    (x, y)
}

/// Estimator stub that records fit calls and the data they received.
pub struct MockEstimator {
    pub fit_calls: usize,
    pub last_fit_rows: Option<usize>,
    pub last_fit_y: Option<Vec<String>>,
    fitted: bool,
    introspectable: bool,
}

impl MockEstimator {
    pub fn unfitted() -> Self {
        Self {
            fit_calls: 0,
            last_fit_rows: None,
            last_fit_y: None,
            fitted: false,
            introspectable: true,
        }
    }

    pub fn fitted() -> Self {
        Self {
            fitted: true,
            ..Self::unfitted()
        }
    }

    /// Hide the fitted state so callers have to try `predict`.
    pub fn opaque(mut self) -> Self {
        self.introspectable = false;
        self
    }
}

impl Estimator for MockEstimator {
    fn fit(&mut self, x: &ndarray::Array2<f64>, y: &[String]) -> Result<()> {
        self.fit_calls += 1;
        self.last_fit_rows = Some(x.nrows());
        self.last_fit_y = Some(y.to_vec());
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: &ndarray::Array2<f64>) -> Result<Vec<String>> {
        if !self.fitted {
            return Err(YellowbrickError::NotFitted("MockEstimator".to_string()));
        }
        Ok(vec!["a".to_string(); x.nrows()])
    }

    fn name(&self) -> String {
        "MockEstimator".to_string()
    }

    fn fitted_hint(&self) -> Option<bool> {
        self.introspectable.then_some(self.fitted)
    }
}

/// Backend that records what it was asked to do instead of rendering.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    pub shown: Rc<RefCell<usize>>,
    pub saved: Rc<RefCell<Vec<PathBuf>>>,
}

impl RecordingBackend {
    pub fn show_count(&self) -> usize {
        *self.shown.borrow()
    }

    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.saved.borrow().clone()
    }
}

impl Backend for RecordingBackend {
    fn show(&self, _figure: &Figure) -> Result<()> {
        *self.shown.borrow_mut() += 1;
        Ok(())
    }

    fn save(&self, _figure: &Figure, path: &Path) -> Result<()> {
        self.saved.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

use ndarray::{Array1, Array2, Axis};

use crate::error::{Result, YellowbrickError};
use crate::estimator::Estimator;
use crate::metrics::unique_labels;

/// Nearest centroid classifier.
///
/// Each class is represented by the mean of its training rows; samples get
/// the label of the closest centroid (euclidean distance). Probabilities are
/// a softmax over negative distances.
#[derive(Debug, Clone, Default)]
pub struct NearestCentroid {
    classes: Vec<String>,
    centroids: Option<Array2<f64>>,
}

impl NearestCentroid {
    pub fn new() -> Self {
        Self::default()
    }

    fn centroids(&self) -> Result<&Array2<f64>> {
        self.centroids
            .as_ref()
            .ok_or_else(|| YellowbrickError::NotFitted("NearestCentroid".to_string()))
    }

    fn distances(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let centroids = self.centroids()?;
        if x.ncols() != centroids.ncols() {
            return Err(YellowbrickError::Shape(format!(
                "X has {} features, but NearestCentroid is expecting {} features",
                x.ncols(),
                centroids.ncols()
            )));
        }

        let mut dist = Array2::zeros((x.nrows(), centroids.nrows()));
        for (i, row) in x.outer_iter().enumerate() {
            for (k, centroid) in centroids.outer_iter().enumerate() {
                let d: f64 = row
                    .iter()
                    .zip(centroid.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                dist[[i, k]] = d.sqrt();
            }
        }
        Ok(dist)
    }
}

impl Estimator for NearestCentroid {
    fn fit(&mut self, x: &Array2<f64>, y: &[String]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(YellowbrickError::Shape(format!(
                "X has {} rows but y has {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if y.is_empty() {
            return Err(YellowbrickError::Shape("cannot fit on an empty dataset".to_string()));
        }

        let classes = unique_labels(y);
        let mut centroids = Array2::zeros((classes.len(), x.ncols()));
        for (k, class) in classes.iter().enumerate() {
            let rows: Vec<usize> = y
                .iter()
                .enumerate()
                .filter(|(_, label)| *label == class)
                .map(|(i, _)| i)
                .collect();
            let members = x.select(Axis(0), &rows);
            let mean: Array1<f64> = members
                .mean_axis(Axis(0))
                .unwrap_or_else(|| Array1::zeros(x.ncols()));
            centroids.row_mut(k).assign(&mean);
        }

        log::debug!("Fitted NearestCentroid with {} classes", classes.len());
        self.classes = classes;
        self.centroids = Some(centroids);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>> {
        let dist = self.distances(x)?;
        Ok(dist
            .outer_iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .fold((0, f64::INFINITY), |acc, (k, &d)| if d < acc.1 { (k, d) } else { acc })
                    .0;
                self.classes[best].clone()
            })
            .collect())
    }

    fn classes(&self) -> Option<Vec<String>> {
        self.centroids.as_ref().map(|_| self.classes.clone())
    }

    fn name(&self) -> String {
        "NearestCentroid".to_string()
    }

    fn fitted_hint(&self) -> Option<bool> {
        Some(self.centroids.is_some())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let mut proba = self.distances(x)?.mapv(|d| -d);
        for mut row in proba.outer_iter_mut() {
            let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            row.mapv_inplace(|v| (v - max).exp());
            let total = row.sum();
            row.mapv_inplace(|v| v / total);
        }
        Ok(proba)
    }
}

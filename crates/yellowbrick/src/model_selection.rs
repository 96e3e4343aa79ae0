use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, YellowbrickError};

/// A shuffled train/test split of a labelled dataset.
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Vec<String>,
    pub y_test: Vec<String>,
}

/// Shuffle and split `(x, y)`, holding out `ceil(test_size * n)` samples.
///
/// # Arguments
///
/// * `test_size` - Fraction of samples in the test split, in `(0, 1)`
/// * `random_state` - Seed for a reproducible shuffle; `None` draws from entropy
pub fn train_test_split(
    x: &Array2<f64>,
    y: &[String],
    test_size: f64,
    random_state: Option<u64>,
) -> Result<Split> {
    let n = x.nrows();
    if n != y.len() {
        return Err(YellowbrickError::Shape(format!(
            "X has {} rows but y has {} labels",
            n,
            y.len()
        )));
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(YellowbrickError::Validation(format!(
            "test_size={} should be between 0 and 1",
            test_size
        )));
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(YellowbrickError::Validation(format!(
            "with n_samples={} and test_size={}, one of the splits would be empty",
            n, test_size
        )));
    }

    let mut rng = match random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut permutation: Vec<usize> = (0..n).collect();
    permutation.shuffle(&mut rng);
    let (test_idx, train_idx) = permutation.split_at(n_test);

    let pick = |idx: &[usize]| idx.iter().map(|&i| y[i].clone()).collect::<Vec<_>>();

    Ok(Split {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: pick(train_idx),
        y_test: pick(test_idx),
    })
}

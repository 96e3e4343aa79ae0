use std::path::PathBuf;

use anyhow::Result;
use ndarray::Array2;
use yellowbrick::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    // Two noisy features, three classes laid out along the diagonal
    let n_per_class = 40;
    let mut values = Vec::with_capacity(n_per_class * 3 * 2);
    let mut y = Vec::with_capacity(n_per_class * 3);
    for (k, class) in ["setosa", "versicolor", "virginica"].iter().enumerate() {
        for j in 0..n_per_class {
            let jitter = (j as f64 * 0.37).sin() * 1.5;
            values.push(3.0 * k as f64 + jitter);
            values.push(3.0 * k as f64 - jitter * 0.5);
            y.push(class.to_string());
        }
    }
    let x = Array2::from_shape_vec((y.len(), 2), values)?;

    println!("Synthetic X shape: {:?}", x.shape());

    let config = ClassificationReportConfig {
        support: Some("count".into()),
        ..Default::default()
    };
    let mut report = classification_report(NearestCentroid::new(), &x, &y, &config, Some(42))?;
    println!("Accuracy on held-out split: {:.3}", report.last_score().unwrap_or_default());

    let mut rocauc = roc_auc(NearestCentroid::new(), &x, &y, &RocAucConfig::default(), Some(42))?;
    println!("Micro-average ROC AUC: {:.3}", rocauc.last_score().unwrap_or_default());

    let out_dir = PathBuf::from("target/yellowbrick");
    std::fs::create_dir_all(&out_dir)?;
    report.poof(Some(out_dir.join("classification_report.html").as_path()), false)?;
    rocauc.poof(Some(out_dir.join("rocauc.html").as_path()), false)?;

    println!("Wrote figures to {}", out_dir.display());
    Ok(())
}

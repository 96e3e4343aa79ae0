use crate::error::{Result, YellowbrickError};
use crate::plot::colors::resolve_colors;
use crate::plot::figure::{Axes, LegendLoc};

/// Draw a stacked bar chart, one bar series per row of `data`.
///
/// # Arguments
///
/// * `ax` - The axes to draw on
/// * `data` - `data[row][col]`, rows are stacked on top of each other
/// * `labels` - Legend label for each row
/// * `ticks` - Tick label for each column
/// * `colors` / `colormap` - Colors for each row, see [`resolve_colors`]
pub fn bar_stack(
    ax: &Axes,
    data: &[Vec<f64>],
    labels: &[String],
    ticks: &[String],
    colors: Option<&[String]>,
    colormap: Option<&str>,
) -> Result<()> {
    let ncols = ticks.len();
    if let Some(row) = data.iter().find(|row| row.len() != ncols) {
        return Err(YellowbrickError::Shape(format!(
            "bar stack row has {} values but {} ticks were given",
            row.len(),
            ncols
        )));
    }
    if labels.len() != data.len() {
        return Err(YellowbrickError::Shape(format!(
            "bar stack has {} rows but {} labels",
            data.len(),
            labels.len()
        )));
    }

    let colors = resolve_colors(data.len(), colormap, colors)?;
    let x: Vec<f64> = (0..ncols).map(|i| i as f64).collect();
    let mut bottom = vec![0.0; ncols];

    for ((row, label), color) in data.iter().zip(labels).zip(colors) {
        ax.stacked_bar(x.clone(), row.clone(), bottom.clone(), color, Some(label.clone()));
        for (b, v) in bottom.iter_mut().zip(row) {
            *b += v;
        }
    }

    ax.set_xticks(x, ticks.to_vec(), 90.0);
    ax.legend(LegendLoc::Best);
    Ok(())
}

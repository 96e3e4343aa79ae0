use std::path::Path;

use crate::base::{emit_figure, PoofOutcome, Visualize, Visualizer};
use crate::error::{Result, YellowbrickError, YellowbrickWarning};
use crate::plot::{Axes, Figure};

/// Object-safe view of a visualizer placed in a [`VisualizerGrid`] cell.
pub trait GridCell<X: ?Sized> {
    fn fit_cell(&mut self, x: &X, y: Option<&[String]>) -> Result<()>;

    fn finalize_cell(&mut self) -> Result<Axes>;

    fn set_cell_ax(&mut self, ax: Axes);

    fn cell_name(&self) -> String;
}

impl<V: Visualize> GridCell<V::Input> for V {
    fn fit_cell(&mut self, x: &V::Input, y: Option<&[String]>) -> Result<()> {
        self.fit(x, y).map(|_| ())
    }

    fn finalize_cell(&mut self) -> Result<Axes> {
        self.finalize()
    }

    fn set_cell_ax(&mut self, ax: Axes) {
        self.visualizer_mut().set_ax(ax);
    }

    fn cell_name(&self) -> String {
        self.name()
    }
}

/// Resolve the `(nrows, ncols)` of a grid holding `n` plots.
///
/// At most one of `nrows` and `ncols` may be given; the other is derived.
/// With neither, the layout is as square as possible with the extra room
/// going to columns.
pub fn grid_shape(n: usize, nrows: Option<usize>, ncols: Option<usize>) -> Result<(usize, usize)> {
    let div_ceil = |a: usize, b: usize| ((a + b - 1) / b).max(1);
    match (nrows, ncols) {
        (Some(_), Some(_)) => Err(YellowbrickError::Validation(
            "You can only specify either nrows or ncols, the other will be calculated.".to_string(),
        )),
        (Some(0), None) | (None, Some(0)) => Err(YellowbrickError::Validation(
            "nrows and ncols must be positive".to_string(),
        )),
        (Some(nrows), None) => Ok((nrows, div_ceil(n, nrows))),
        (None, Some(ncols)) => Ok((div_ceil(n, ncols), ncols)),
        (None, None) => {
            let ncols = ((n as f64).sqrt().ceil() as usize).max(1);
            Ok((div_ceil(n, ncols), ncols))
        }
    }
}

/// Several visualizers drawn into the cells of one shared figure.
///
/// Children are assigned their cells in row-major order when the grid is
/// built; cells without a visualizer are hidden.
pub struct VisualizerGrid<X: ?Sized> {
    base: Visualizer,
    visualizers: Vec<Box<dyn GridCell<X>>>,
    nrows: usize,
    ncols: usize,
    axarr: Vec<Axes>,
}

impl<X: ?Sized> VisualizerGrid<X> {
    pub fn new(
        mut visualizers: Vec<Box<dyn GridCell<X>>>,
        nrows: Option<usize>,
        ncols: Option<usize>,
    ) -> Result<Self> {
        let (nrows, ncols) = grid_shape(visualizers.len(), nrows, ncols)?;
        let (fig, axarr) = Figure::subplots(nrows, ncols);

        for (idx, ax) in axarr.iter().enumerate() {
            match visualizers.get_mut(idx) {
                Some(viz) => viz.set_cell_ax(ax.clone()),
                None => ax.axis_off(),
            }
        }
        if visualizers.len() > axarr.len() {
            log::warn!(
                "{} visualizers do not fit in a {}x{} grid and will not be drawn",
                visualizers.len() - axarr.len(),
                nrows,
                ncols
            );
        }

        let mut base = Visualizer::new();
        base.set_fig(fig);
        base.set_ax(axarr[0].clone());

        Ok(Self {
            base,
            visualizers,
            nrows,
            ncols,
            axarr,
        })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn len(&self) -> usize {
        self.visualizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visualizers.is_empty()
    }

    /// Cell axes in row-major order.
    pub fn axes(&self) -> &[Axes] {
        &self.axarr
    }

    fn finalize_children(&mut self) -> Result<()> {
        for viz in self.visualizers.iter_mut().take(self.axarr.len()) {
            viz.finalize_cell()?;
        }
        self.base.fig().tight_layout();
        Ok(())
    }
}

impl<X: ?Sized> Visualize for VisualizerGrid<X> {
    type Input = X;

    fn visualizer(&self) -> &Visualizer {
        &self.base
    }

    fn visualizer_mut(&mut self) -> &mut Visualizer {
        &mut self.base
    }

    fn name(&self) -> String {
        "VisualizerGrid".to_string()
    }

    fn fit(&mut self, x: &X, y: Option<&[String]>) -> Result<&mut Self> {
        for viz in self.visualizers.iter_mut() {
            log::debug!("Fitting grid cell {}", viz.cell_name());
            viz.fit_cell(x, y)?;
        }
        Ok(self)
    }

    fn finalize(&mut self) -> Result<Axes> {
        self.finalize_children()?;
        Ok(self.base.ax())
    }

    fn poof(&mut self, outpath: Option<&Path>, clear_figure: bool) -> Result<PoofOutcome> {
        self.finalize_children()?;

        let mut warnings = Vec::new();
        if !self.axarr.iter().any(|ax| ax.has_data()) {
            let warning = YellowbrickWarning::EmptyAxes(self.name());
            log::warn!("{}", warning);
            warnings.push(warning);
        }

        let fig = self.base.fig();
        let backend = self.base.backend();
        let mut outcome = emit_figure(&fig, backend.as_ref(), outpath, clear_figure)?;
        outcome.warnings = warnings;
        Ok(outcome)
    }
}

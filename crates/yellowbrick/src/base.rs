//! Base visualizer state and the fit/draw/finalize/poof lifecycle.
//!
//! Every chart type embeds a [`Visualizer`], which owns the lazily created
//! drawing surface and canvas, and implements [`Visualize`]. Visualizers
//! that wrap a model embed a [`ScoreVisualizer`] instead.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use ndarray::Array2;

use crate::config::{FitState, VisualizerConfig};
use crate::error::{Result, YellowbrickError, YellowbrickWarning};
use crate::estimator::{check_fitted, Estimator};
use crate::metrics::unique_labels;
use crate::plot::{Axes, Backend, Figure, PlotlyBackend};

/// What happened when a figure was emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoofOutcome {
    /// Path the figure was saved to, if any.
    pub saved_to: Option<PathBuf>,
    /// Whether the figure was shown interactively.
    pub shown: bool,
    pub warnings: Vec<YellowbrickWarning>,
}

/// Drawing surface bookkeeping shared by all visualizers.
pub struct Visualizer {
    ax: Option<Axes>,
    fig: Option<Figure>,
    size: Option<(f64, f64)>,
    title: Option<String>,
    backend: Rc<dyn Backend>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            ax: None,
            fig: None,
            size: None,
            title: None,
            backend: Rc::new(PlotlyBackend),
        }
    }

    pub fn from_config(config: &VisualizerConfig) -> Self {
        let mut viz = Self::new();
        viz.title = config.title.clone();
        viz.size = config.size;
        viz
    }

    /// Draw onto an existing surface instead of a fresh figure.
    pub fn with_ax(mut self, ax: Axes) -> Self {
        self.set_ax(ax);
        self
    }

    pub fn with_backend(mut self, backend: impl Backend + 'static) -> Self {
        self.backend = Rc::new(backend);
        self
    }

    pub fn set_backend(&mut self, backend: Rc<dyn Backend>) {
        self.backend = backend;
    }

    pub fn backend(&self) -> Rc<dyn Backend> {
        Rc::clone(&self.backend)
    }

    /// The drawing surface, created on the canvas at first access.
    pub fn ax(&mut self) -> Axes {
        if let Some(ax) = &self.ax {
            return ax.clone();
        }
        let ax = self.fig().gca();
        self.ax = Some(ax.clone());
        ax
    }

    /// The drawing surface, without creating one.
    pub fn ax_if_set(&self) -> Option<&Axes> {
        self.ax.as_ref()
    }

    /// Replace the drawing surface; the canvas follows the new surface.
    pub fn set_ax(&mut self, ax: Axes) {
        self.fig = Some(ax.figure());
        self.ax = Some(ax);
    }

    /// The canvas owning the drawing surface, created at first access.
    pub fn fig(&mut self) -> Figure {
        if let Some(fig) = &self.fig {
            return fig.clone();
        }
        let fig = match &self.ax {
            Some(ax) => ax.figure(),
            None => Figure::new(),
        };
        if let Some((width, height)) = self.size {
            fig.set_size_px(width, height);
        }
        self.fig = Some(fig.clone());
        fig
    }

    /// The canvas, without creating one.
    pub fn fig_if_set(&self) -> Option<&Figure> {
        self.fig.as_ref()
    }

    pub fn set_fig(&mut self, fig: Figure) {
        self.fig = Some(fig);
    }

    /// Size in pixels: the explicit size if one was set, else the canvas size.
    pub fn size(&mut self) -> (f64, f64) {
        match self.size {
            Some(size) => size,
            None => self.fig().size_px(),
        }
    }

    /// Explicit size, without falling back to the canvas.
    pub fn size_if_set(&self) -> Option<(f64, f64)> {
        self.size
    }

    pub fn set_size(&mut self, size: (f64, f64)) {
        self.size = Some(size);
        self.fig().set_size_px(size.0, size.1);
    }

    /// Title override, if one was configured.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the surface title, preferring the configured title over `default`.
    pub fn set_title(&mut self, default: &str) {
        let title = self.title.clone().unwrap_or_else(|| default.to_string());
        self.ax().set_title(title);
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Finalize-independent half of `poof`: persist or show, then clear.
pub(crate) fn emit_figure(
    fig: &Figure,
    backend: &dyn Backend,
    outpath: Option<&Path>,
    clear_figure: bool,
) -> Result<PoofOutcome> {
    let mut outcome = PoofOutcome::default();
    match outpath {
        Some(path) => {
            backend.save(fig, path)?;
            outcome.saved_to = Some(path.to_path_buf());
        }
        None => {
            backend.show(fig)?;
            outcome.shown = true;
        }
    }
    if clear_figure {
        fig.clear();
    }
    Ok(outcome)
}

/// The uniform lifecycle of every chart.
///
/// `fit` computes what the chart needs (and usually draws), `draw` renders
/// onto the surface, `finalize` adds titles, ticks and legends, and `poof`
/// finalizes then saves or shows the canvas.
pub trait Visualize {
    /// Data accepted by `fit`.
    type Input: ?Sized;

    fn visualizer(&self) -> &Visualizer;

    fn visualizer_mut(&mut self) -> &mut Visualizer;

    /// Name used in titles and warnings.
    fn name(&self) -> String {
        "Visualizer".to_string()
    }

    fn fit(&mut self, _x: &Self::Input, _y: Option<&[String]>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        Ok(self)
    }

    fn draw(&mut self) -> Result<Axes> {
        Err(YellowbrickError::NotImplemented("draw"))
    }

    fn finalize(&mut self) -> Result<Axes> {
        Ok(self.visualizer_mut().ax())
    }

    fn ax(&mut self) -> Axes {
        self.visualizer_mut().ax()
    }

    /// Finalize, then save to `outpath` or show, then optionally clear the canvas.
    ///
    /// A visualizer that never touched its surface is still finalized and
    /// emitted; the outcome carries a `NoAxes` warning.
    fn poof(&mut self, outpath: Option<&Path>, clear_figure: bool) -> Result<PoofOutcome> {
        let mut warnings = Vec::new();
        if self.visualizer().ax_if_set().is_none() {
            let warning = YellowbrickWarning::NoAxes(self.name());
            log::warn!("{}", warning);
            warnings.push(warning);
        }

        let ax = self.finalize()?;
        if warnings.is_empty() && !ax.has_data() {
            let warning = YellowbrickWarning::EmptyAxes(self.name());
            log::warn!("{}", warning);
            warnings.push(warning);
        }

        let fig = self.visualizer_mut().fig();
        let backend = self.visualizer().backend();
        let mut outcome = emit_figure(&fig, backend.as_ref(), outpath, clear_figure)?;
        outcome.warnings = warnings;
        Ok(outcome)
    }
}

impl Visualize for Visualizer {
    type Input = Array2<f64>;

    fn visualizer(&self) -> &Visualizer {
        self
    }

    fn visualizer_mut(&mut self) -> &mut Visualizer {
        self
    }
}

/// Base for visualizers that wrap an estimator.
///
/// Fitting the visualizer fits the estimator only when needed, see
/// [`FitState`], and then resolves the class labels used for display.
pub struct ScoreVisualizer<E> {
    base: Visualizer,
    estimator: E,
    is_fitted: FitState,
    classes: Option<Vec<String>>,
    fitted_classes: Vec<String>,
}

impl<E: Estimator> ScoreVisualizer<E> {
    pub fn new(estimator: E, classes: Option<Vec<String>>, is_fitted: FitState) -> Self {
        Self {
            base: Visualizer::new(),
            estimator,
            is_fitted,
            classes,
            fitted_classes: Vec::new(),
        }
    }

    /// Replace the surface bookkeeping, e.g. to draw on a shared figure.
    pub fn with_visualizer(mut self, base: Visualizer) -> Self {
        self.base = base;
        self
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn estimator_mut(&mut self) -> &mut E {
        &mut self.estimator
    }

    pub fn into_estimator(self) -> E {
        self.estimator
    }

    pub fn is_fitted(&self) -> FitState {
        self.is_fitted
    }

    /// Class labels resolved by the last `fit`.
    pub fn classes(&self) -> &[String] {
        &self.fitted_classes
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<String>> {
        self.estimator.predict(x)
    }

    /// The wrapped estimator's own score.
    pub fn score(&self, x: &Array2<f64>, y: &[String]) -> Result<f64> {
        self.estimator.score(x, y)
    }

    fn needs_fit(&self, x: &Array2<f64>) -> Result<bool> {
        match self.is_fitted {
            FitState::Fitted => Ok(false),
            FitState::Unfitted => Ok(true),
            FitState::AutoDetect => Ok(!check_fitted(&self.estimator, x)?),
        }
    }
}

impl<E: Estimator> Visualize for ScoreVisualizer<E> {
    type Input = Array2<f64>;

    fn visualizer(&self) -> &Visualizer {
        &self.base
    }

    fn visualizer_mut(&mut self) -> &mut Visualizer {
        &mut self.base
    }

    fn name(&self) -> String {
        self.estimator.name()
    }

    fn fit(&mut self, x: &Array2<f64>, y: Option<&[String]>) -> Result<&mut Self> {
        if self.needs_fit(x)? {
            let y = y.ok_or_else(|| {
                YellowbrickError::Validation("y is required to fit the wrapped estimator".to_string())
            })?;
            log::debug!("Fitting {} on {} samples", self.estimator.name(), x.nrows());
            self.estimator.fit(x, y)?;
        } else {
            log::debug!("{} is already fitted, skipping fit", self.estimator.name());
        }

        self.fitted_classes = match (&self.classes, y) {
            (Some(classes), _) => classes.clone(),
            (None, Some(y)) => unique_labels(y),
            (None, None) => self.estimator.classes().unwrap_or_default(),
        };
        Ok(self)
    }
}

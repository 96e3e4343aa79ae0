//! In-memory figure (canvas) and axes (drawing surface) model.
//!
//! A [`Figure`] owns a grid of axes slots. An [`Axes`] is a cheap handle to
//! one slot of one figure; visualizers record drawing primitives on it and
//! a [`Backend`](crate::plot::Backend) turns the whole figure into output.
//! Handles are reference counted and single threaded.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::plot::colors::{Colormap, Rgb};

/// Default figure size in inches.
pub const DEFAULT_FIGSIZE: (f64, f64) = (6.4, 4.8);
/// Default resolution in dots per inch.
pub const DEFAULT_DPI: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendLoc {
    Best,
    LowerRight,
    UpperRight,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarSeries {
    pub x: Vec<f64>,
    pub heights: Vec<f64>,
    /// Offsets for stacked bars.
    pub bottom: Option<Vec<f64>>,
    pub colors: Vec<Rgb>,
    pub label: Option<String>,
}

/// A grid of values colored through a colormap, one cell per value.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorMesh {
    /// Row-major values, `values[row][col]`.
    pub values: Vec<Vec<f64>>,
    pub vmin: f64,
    pub vmax: f64,
    pub cmap: Colormap,
    pub edge_color: Option<Rgb>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Option<Rgb>,
    pub style: LineStyle,
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Artist {
    Bars(BarSeries),
    Mesh(ColorMesh),
    Line(LineSeries),
    Text(TextLabel),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ticks {
    pub positions: Vec<f64>,
    pub labels: Vec<String>,
    /// Counter-clockwise label rotation in degrees.
    pub rotation: f64,
}

/// Everything recorded on one drawing surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxesState {
    pub artists: Vec<Artist>,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xticks: Option<Ticks>,
    pub yticks: Option<Ticks>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub legend: Option<LegendLoc>,
    pub colorbar: bool,
    pub hidden: bool,
}

impl AxesState {
    pub fn has_data(&self) -> bool {
        !self.artists.is_empty()
    }
}

#[derive(Debug)]
struct AxesSlot {
    row: usize,
    col: usize,
    state: AxesState,
}

#[derive(Debug)]
struct FigureState {
    size_inches: (f64, f64),
    dpi: f64,
    nrows: usize,
    ncols: usize,
    slots: Vec<AxesSlot>,
    tight_layout: bool,
}

/// The canvas owning one or more drawing surfaces.
#[derive(Clone)]
pub struct Figure {
    inner: Rc<RefCell<FigureState>>,
}

impl Figure {
    /// An empty figure with the default size and resolution.
    pub fn new() -> Self {
        Self::with_size_inches(DEFAULT_FIGSIZE.0, DEFAULT_FIGSIZE.1)
    }

    pub fn with_size_inches(width: f64, height: f64) -> Self {
        Figure {
            inner: Rc::new(RefCell::new(FigureState {
                size_inches: (width, height),
                dpi: DEFAULT_DPI,
                nrows: 1,
                ncols: 1,
                slots: Vec::new(),
                tight_layout: false,
            })),
        }
    }

    /// A figure with an `nrows` x `ncols` grid of axes in row-major order.
    pub fn subplots(nrows: usize, ncols: usize) -> (Figure, Vec<Axes>) {
        let fig = Figure::new();
        let nrows = nrows.max(1);
        let ncols = ncols.max(1);
        let mut axes = Vec::with_capacity(nrows * ncols);
        for row in 0..nrows {
            for col in 0..ncols {
                axes.push(fig.add_subplot(nrows, ncols, row, col));
            }
        }
        (fig, axes)
    }

    /// Add (or fetch) the axes at `(row, col)` of an `nrows` x `ncols` grid.
    pub fn add_subplot(&self, nrows: usize, ncols: usize, row: usize, col: usize) -> Axes {
        let mut state = self.inner.borrow_mut();
        state.nrows = state.nrows.max(nrows);
        state.ncols = state.ncols.max(ncols);

        let index = match state.slots.iter().position(|s| s.row == row && s.col == col) {
            Some(index) => index,
            None => {
                state.slots.push(AxesSlot {
                    row,
                    col,
                    state: AxesState::default(),
                });
                state.slots.len() - 1
            }
        };

        Axes {
            figure: self.clone(),
            index,
        }
    }

    /// The current axes, creating a single full-figure axes when there is none.
    pub fn gca(&self) -> Axes {
        if self.inner.borrow().slots.is_empty() {
            return self.add_subplot(1, 1, 0, 0);
        }
        Axes {
            figure: self.clone(),
            index: 0,
        }
    }

    pub fn axes(&self) -> Vec<Axes> {
        (0..self.inner.borrow().slots.len())
            .map(|index| Axes {
                figure: self.clone(),
                index,
            })
            .collect()
    }

    pub fn grid_shape(&self) -> (usize, usize) {
        let state = self.inner.borrow();
        (state.nrows, state.ncols)
    }

    pub fn size_inches(&self) -> (f64, f64) {
        self.inner.borrow().size_inches
    }

    pub fn set_size_inches(&self, width: f64, height: f64) {
        self.inner.borrow_mut().size_inches = (width, height);
    }

    pub fn dpi(&self) -> f64 {
        self.inner.borrow().dpi
    }

    pub fn set_dpi(&self, dpi: f64) {
        self.inner.borrow_mut().dpi = dpi;
    }

    /// Physical size converted to pixels.
    pub fn size_px(&self) -> (f64, f64) {
        let state = self.inner.borrow();
        (state.size_inches.0 * state.dpi, state.size_inches.1 * state.dpi)
    }

    pub fn set_size_px(&self, width: f64, height: f64) {
        let mut state = self.inner.borrow_mut();
        let dpi = state.dpi;
        state.size_inches = (width / dpi, height / dpi);
    }

    pub fn tight_layout(&self) {
        self.inner.borrow_mut().tight_layout = true;
    }

    pub fn is_tight_layout(&self) -> bool {
        self.inner.borrow().tight_layout
    }

    /// Remove everything drawn on every axes; existing handles stay valid.
    pub fn clear(&self) {
        let mut state = self.inner.borrow_mut();
        for slot in state.slots.iter_mut() {
            slot.state = AxesState::default();
        }
        state.tight_layout = false;
    }

    pub fn ptr_eq(&self, other: &Figure) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Figure {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Figure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Figure")
            .field("size_inches", &state.size_inches)
            .field("dpi", &state.dpi)
            .field("grid", &(state.nrows, state.ncols))
            .field("axes", &state.slots.len())
            .finish()
    }
}

/// Handle to one drawing surface of a [`Figure`].
#[derive(Clone)]
pub struct Axes {
    figure: Figure,
    index: usize,
}

impl Axes {
    pub fn figure(&self) -> Figure {
        self.figure.clone()
    }

    /// Position of this axes in its figure's grid.
    pub fn position(&self) -> (usize, usize) {
        let state = self.figure.inner.borrow();
        let slot = &state.slots[self.index];
        (slot.row, slot.col)
    }

    /// A copy of everything drawn so far.
    pub fn snapshot(&self) -> AxesState {
        self.read(|state| state.clone())
    }

    pub fn has_data(&self) -> bool {
        self.read(AxesState::has_data)
    }

    fn read<R>(&self, f: impl FnOnce(&AxesState) -> R) -> R {
        let state = self.figure.inner.borrow();
        f(&state.slots[self.index].state)
    }

    fn update(&self, f: impl FnOnce(&mut AxesState)) {
        let mut state = self.figure.inner.borrow_mut();
        f(&mut state.slots[self.index].state)
    }

    pub fn bar(&self, x: Vec<f64>, heights: Vec<f64>, colors: Vec<Rgb>, label: Option<String>) {
        self.update(|s| {
            s.artists.push(Artist::Bars(BarSeries {
                x,
                heights,
                bottom: None,
                colors,
                label,
            }))
        });
    }

    pub fn stacked_bar(
        &self,
        x: Vec<f64>,
        heights: Vec<f64>,
        bottom: Vec<f64>,
        color: Rgb,
        label: Option<String>,
    ) {
        self.update(|s| {
            s.artists.push(Artist::Bars(BarSeries {
                x,
                heights,
                bottom: Some(bottom),
                colors: vec![color],
                label,
            }))
        });
    }

    pub fn pcolormesh(&self, mesh: ColorMesh) {
        self.update(|s| s.artists.push(Artist::Mesh(mesh)));
    }

    pub fn plot(&self, x: Vec<f64>, y: Vec<f64>, color: Option<Rgb>, style: LineStyle, label: Option<String>) {
        self.update(|s| {
            s.artists.push(Artist::Line(LineSeries {
                x,
                y,
                color,
                style,
                label,
            }))
        });
    }

    pub fn text(&self, x: f64, y: f64, text: impl Into<String>, color: Rgb) {
        let text = text.into();
        self.update(|s| s.artists.push(Artist::Text(TextLabel { x, y, text, color })));
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.update(|s| s.title = Some(title));
    }

    pub fn set_xlabel(&self, label: impl Into<String>) {
        let label = label.into();
        self.update(|s| s.xlabel = Some(label));
    }

    pub fn set_ylabel(&self, label: impl Into<String>) {
        let label = label.into();
        self.update(|s| s.ylabel = Some(label));
    }

    pub fn set_xticks(&self, positions: Vec<f64>, labels: Vec<String>, rotation: f64) {
        self.update(|s| {
            s.xticks = Some(Ticks {
                positions,
                labels,
                rotation,
            })
        });
    }

    pub fn set_yticks(&self, positions: Vec<f64>, labels: Vec<String>, rotation: f64) {
        self.update(|s| {
            s.yticks = Some(Ticks {
                positions,
                labels,
                rotation,
            })
        });
    }

    pub fn set_xlim(&self, left: f64, right: f64) {
        self.update(|s| s.xlim = Some((left, right)));
    }

    pub fn set_ylim(&self, bottom: f64, top: f64) {
        self.update(|s| s.ylim = Some((bottom, top)));
    }

    pub fn legend(&self, loc: LegendLoc) {
        self.update(|s| s.legend = Some(loc));
    }

    pub fn colorbar(&self) {
        self.update(|s| s.colorbar = true);
    }

    /// Hide the axis entirely (used for unused grid cells).
    pub fn axis_off(&self) {
        self.update(|s| s.hidden = true);
    }
}

impl PartialEq for Axes {
    fn eq(&self, other: &Self) -> bool {
        self.figure.ptr_eq(&other.figure) && self.index == other.index
    }
}

impl fmt::Debug for Axes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Axes")
            .field("index", &self.index)
            .field("position", &self.position())
            .finish()
    }
}

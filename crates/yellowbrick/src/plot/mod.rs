//! Plotting primitives consumed by the visualizers.
//!
//! Visualizers never talk to a plotting library directly: they record bars,
//! meshes, lines and text on an [`Axes`] and hand the owning [`Figure`] to a
//! [`Backend`] when the chart is emitted.
pub mod backend;
pub mod colors;
pub mod draw;
pub mod figure;

pub use backend::{render, Backend, PlotlyBackend, RenderedFigure};
pub use colors::{find_text_color, resolve_colors, Colormap, Rgb};
pub use draw::bar_stack;
pub use figure::{Artist, Axes, AxesState, ColorMesh, Figure, LegendLoc, LineStyle};

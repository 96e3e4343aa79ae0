use std::path::Path;

use plotly::common::{ColorScale, ColorScaleElement, DashType, Font, Line, Marker, Mode};
use plotly::layout::{Annotation, Axis, BarMode, GridPattern, LayoutGrid, Margin};
use plotly::{Bar, HeatMap, Layout, Plot, Scatter};
use serde_json::Value;

use crate::error::{Result, YellowbrickError};
use crate::plot::figure::{Artist, AxesState, ColorMesh, Figure, LineStyle, Ticks};

/// Emits a finished figure, either interactively or to a file.
pub trait Backend {
    fn show(&self, figure: &Figure) -> Result<()>;

    fn save(&self, figure: &Figure, path: &Path) -> Result<()>;
}

/// Renders figures with plotly. Saves `.html` pages or `.json` specs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlotlyBackend;

/// Axis pairs that `plotly::Layout` has setters for.
const LAYOUT_AXES: usize = 8;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

impl Backend for PlotlyBackend {
    fn show(&self, figure: &Figure) -> Result<()> {
        let rendered = render(figure)?;
        if rendered.extra_axes.is_empty() {
            rendered.plot.show();
            return Ok(());
        }
        let path = std::env::temp_dir().join("yellowbrick-figure.html");
        std::fs::write(&path, rendered.to_html()?)?;
        log::info!("Figure has more subplots than the plotly viewer lays out; open {}", path.display());
        Ok(())
    }

    fn save(&self, figure: &Figure, path: &Path) -> Result<()> {
        let rendered = render(figure)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let contents = match ext.as_str() {
            "html" | "htm" => rendered.to_html()?,
            "json" => rendered.to_json()?,
            _ => return Err(YellowbrickError::UnsupportedFormat(ext)),
        };

        std::fs::write(path, contents)?;
        log::info!("Saved figure to {}", path.display());
        Ok(())
    }
}

/// A rendered figure.
///
/// Axes numbered past what `plotly::Layout` can hold are kept aside and
/// merged into the serialized layout as `xaxisN`/`yaxisN`.
pub struct RenderedFigure {
    plot: Plot,
    extra_axes: Vec<(usize, Axis, Axis)>,
}

impl RenderedFigure {
    pub fn plot(&self) -> &Plot {
        &self.plot
    }

    /// The plotly figure spec with every axis pair in its layout.
    pub fn to_value(&self) -> Result<Value> {
        let mut spec: Value = serde_json::from_str(&self.plot.to_json())?;
        if let Some(layout) = spec.get_mut("layout").and_then(Value::as_object_mut) {
            for (number, x, y) in &self.extra_axes {
                layout.insert(format!("xaxis{}", number), serde_json::to_value(x)?);
                layout.insert(format!("yaxis{}", number), serde_json::to_value(y)?);
            }
        }
        Ok(spec)
    }

    pub fn to_json(&self) -> Result<String> {
        if self.extra_axes.is_empty() {
            return Ok(self.plot.to_json());
        }
        Ok(self.to_value()?.to_string())
    }

    /// A standalone page loading plotly.js.
    pub fn to_html(&self) -> Result<String> {
        if self.extra_axes.is_empty() {
            return Ok(self.plot.to_html());
        }
        let spec = self.to_value()?.to_string().replace("</", "<\\/");
        Ok(format!(
            "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n\
             <script src=\"{}\"></script>\n</head>\n<body>\n\
             <div id=\"yellowbrick-figure\"></div>\n<script>\n\
             var figure = {};\n\
             Plotly.newPlot(\"yellowbrick-figure\", figure.data, figure.layout, figure.config);\n\
             </script>\n</body>\n</html>\n",
            PLOTLY_JS, spec
        ))
    }
}

/// Build the plotly plot for every axes of `figure`.
///
/// Hidden axes with nothing drawn on them are left out.
pub fn render(figure: &Figure) -> Result<RenderedFigure> {
    let (nrows, ncols) = figure.grid_shape();
    let (width, height) = figure.size_px();
    let axes = figure.axes();

    let mut plot = Plot::new();
    let mut layout = Layout::new()
        .width(width.round() as usize)
        .height(height.round() as usize);

    if nrows * ncols > 1 {
        layout = layout.grid(
            LayoutGrid::new()
                .rows(nrows)
                .columns(ncols)
                .pattern(GridPattern::Independent),
        );
    }
    if figure.is_tight_layout() {
        layout = layout.margin(Margin::new().left(50).right(20).top(50).bottom(50));
    }

    let mut annotations = Vec::new();
    let mut extra_axes = Vec::new();
    let mut stacked = false;
    let mut show_legend = false;

    for ax in axes.iter() {
        let state = ax.snapshot();
        if state.hidden && state.artists.is_empty() {
            continue;
        }

        let (row, col) = ax.position();
        let number = row * ncols + col + 1;
        let (xref, yref) = if number == 1 {
            ("x".to_string(), "y".to_string())
        } else {
            (format!("x{}", number), format!("y{}", number))
        };

        show_legend |= state.legend.is_some();

        for artist in state.artists.iter() {
            match artist {
                Artist::Bars(bars) => {
                    stacked |= bars.bottom.is_some();
                    let colors: Vec<String> = bars.colors.iter().map(|c| c.to_hex()).collect();
                    let mut trace = Bar::new(bars.x.clone(), bars.heights.clone())
                        .marker(Marker::new().color_array(colors))
                        .x_axis(&xref)
                        .y_axis(&yref);
                    trace = match &bars.label {
                        Some(label) => trace.name(label),
                        None => trace.show_legend(false),
                    };
                    plot.add_trace(trace);
                }
                Artist::Mesh(mesh) => plot.add_trace(mesh_trace(mesh, state.colorbar, &xref, &yref)),
                Artist::Line(line) => {
                    let dash = match line.style {
                        LineStyle::Solid => DashType::Solid,
                        LineStyle::Dashed => DashType::Dash,
                        LineStyle::Dotted => DashType::Dot,
                    };
                    let mut style = Line::new().dash(dash);
                    if let Some(color) = line.color {
                        style = style.color(color.to_hex());
                    }
                    let mut trace = Scatter::new(line.x.clone(), line.y.clone())
                        .mode(Mode::Lines)
                        .line(style)
                        .x_axis(&xref)
                        .y_axis(&yref);
                    trace = match &line.label {
                        Some(label) => trace.name(label),
                        None => trace.show_legend(false),
                    };
                    plot.add_trace(trace);
                }
                Artist::Text(label) => annotations.push(
                    Annotation::new()
                        .x(label.x)
                        .y(label.y)
                        .text(label.text.as_str())
                        .show_arrow(false)
                        .x_ref(xref.as_str())
                        .y_ref(yref.as_str())
                        .font(Font::new().color(label.color.to_hex())),
                ),
            }
        }

        if let Some(title) = &state.title {
            if axes.len() == 1 {
                layout = layout.title(title.as_str());
            } else {
                annotations.push(
                    Annotation::new()
                        .x(0.5)
                        .y(1.08)
                        .text(title.as_str())
                        .show_arrow(false)
                        .x_ref(format!("{} domain", xref).as_str())
                        .y_ref(format!("{} domain", yref).as_str()),
                );
            }
        }

        let (x_axis, y_axis) = axis_pair(&state);
        if number > LAYOUT_AXES {
            extra_axes.push((number, x_axis, y_axis));
        } else {
            layout = set_axis_pair(layout, number, x_axis, y_axis);
        }
    }

    if stacked {
        layout = layout.bar_mode(BarMode::Stack);
    }
    layout = layout.show_legend(show_legend).annotations(annotations);

    plot.set_layout(layout);
    Ok(RenderedFigure { plot, extra_axes })
}

/// Heatmap of cell centers with a stepped colorscale.
///
/// The z range is widened by one color band on each side so the colormap's
/// under and over colors show up for clipped values.
fn mesh_trace(mesh: &ColorMesh, show_scale: bool, xref: &str, yref: &str) -> Box<HeatMap<f64, f64, f64>> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut zs = Vec::new();
    for (row, values) in mesh.values.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            xs.push(col as f64 + 0.5);
            ys.push(row as f64 + 0.5);
            zs.push(*value);
        }
    }

    let colors = mesh.cmap.colors();
    let bands: Vec<String> = std::iter::once(mesh.cmap.under())
        .chain(colors.iter().copied())
        .chain(std::iter::once(mesh.cmap.over()))
        .map(|c| c.to_hex())
        .collect();
    let nbands = bands.len() as f64;
    let mut scale = Vec::with_capacity(bands.len() * 2);
    for (i, color) in bands.into_iter().enumerate() {
        scale.push(ColorScaleElement(i as f64 / nbands, color.clone()));
        scale.push(ColorScaleElement((i + 1) as f64 / nbands, color));
    }

    let pad = (mesh.vmax - mesh.vmin) / colors.len() as f64;
    HeatMap::new(xs, ys, zs)
        .zmin(mesh.vmin - pad)
        .zmax(mesh.vmax + pad)
        .color_scale(ColorScale::Vector(scale))
        .show_scale(show_scale)
        .x_axis(xref)
        .y_axis(yref)
}

fn ticked(mut axis: Axis, ticks: &Option<Ticks>) -> Axis {
    if let Some(ticks) = ticks {
        axis = axis
            .tick_values(ticks.positions.clone())
            .tick_text(ticks.labels.clone())
            .tick_angle(-ticks.rotation);
    }
    axis
}

fn axis_pair(state: &AxesState) -> (Axis, Axis) {
    let mut x = ticked(Axis::new(), &state.xticks);
    let mut y = ticked(Axis::new(), &state.yticks);

    if let Some(label) = &state.xlabel {
        x = x.title(label.as_str());
    }
    if let Some(label) = &state.ylabel {
        y = y.title(label.as_str());
    }
    if let Some((lo, hi)) = state.xlim {
        x = x.range(vec![lo, hi]);
    }
    if let Some((lo, hi)) = state.ylim {
        y = y.range(vec![lo, hi]);
    }
    if state.hidden {
        x = x.visible(false);
        y = y.visible(false);
    }
    (x, y)
}

fn set_axis_pair(layout: Layout, number: usize, x: Axis, y: Axis) -> Layout {
    match number {
        1 => layout.x_axis(x).y_axis(y),
        2 => layout.x_axis2(x).y_axis2(y),
        3 => layout.x_axis3(x).y_axis3(y),
        4 => layout.x_axis4(x).y_axis4(y),
        5 => layout.x_axis5(x).y_axis5(y),
        6 => layout.x_axis6(x).y_axis6(y),
        7 => layout.x_axis7(x).y_axis7(y),
        _ => layout.x_axis8(x).y_axis8(y),
    }
}

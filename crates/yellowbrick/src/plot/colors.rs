//! Colors, colormaps and palettes used by the visualizers.
//!
//! Colormaps are listed (discrete) color sequences in the ColorBrewer style
//! with optional "under" and "over" colors that are used for values falling
//! below 0 or above 1 once normalized.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, YellowbrickError};

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Perceived brightness on the 0..255 scale.
    pub fn brightness(&self) -> f64 {
        let (r, g, b) = (self.0 as f64, self.1 as f64, self.2 as f64);
        (0.241 * r * r + 0.691 * g * g + 0.068 * b * b).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = YellowbrickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "w" | "white" => return Ok(Rgb::WHITE),
            "k" | "black" => return Ok(Rgb::BLACK),
            _ => {}
        }

        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(YellowbrickError::Validation(format!(
                "'{}' is not a valid color, use a '#rrggbb' hex string",
                s
            )));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Rgb(r, g, b)),
            _ => Err(YellowbrickError::Validation(format!("'{}' is not a valid color", s))),
        }
    }
}

/// Color used for reference lines such as the ROC diagonal.
pub const LINE_COLOR: Rgb = Rgb(0x11, 0x11, 0x11);

/// The default color cycle.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#0072b2", "#009e73", "#d55e00", "#cc79a7", "#f0e442", "#56b4e9",
];

const SEQUENCES: &[(&str, [&str; 9])] = &[
    (
        "YlOrRd",
        [
            "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c",
            "#bd0026", "#800026",
        ],
    ),
    (
        "YlGn",
        [
            "#ffffe5", "#f7fcb9", "#d9f0a3", "#addd8e", "#78c679", "#41ab5d", "#238443",
            "#006837", "#004529",
        ],
    ),
    (
        "Blues",
        [
            "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5",
            "#08519c", "#08306b",
        ],
    ),
    (
        "Greens",
        [
            "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45",
            "#006d2c", "#00441b",
        ],
    ),
    (
        "Reds",
        [
            "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d",
            "#a50f15", "#67000d",
        ],
    ),
    (
        "Purples",
        [
            "#fcfbfd", "#efedf5", "#dadaeb", "#bcbddc", "#9e9ac8", "#807dba", "#6a51a3",
            "#54278f", "#3f007d",
        ],
    ),
    (
        "Set1",
        [
            "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628",
            "#f781bf", "#999999",
        ],
    ),
];

/// Names accepted by [`Colormap::from_name`].
pub fn colormap_names() -> Vec<&'static str> {
    SEQUENCES.iter().map(|(name, _)| *name).collect()
}

/// A listed colormap mapping normalized values in `[0, 1]` to colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    name: String,
    colors: Vec<Rgb>,
    under: Option<Rgb>,
    over: Option<Rgb>,
}

impl Colormap {
    pub fn new(name: &str, colors: Vec<Rgb>) -> Result<Self> {
        if colors.is_empty() {
            return Err(YellowbrickError::Validation(format!(
                "colormap '{}' needs at least one color",
                name
            )));
        }
        Ok(Self {
            name: name.to_string(),
            colors,
            under: None,
            over: None,
        })
    }

    /// Look up one of the built-in sequences by (case-insensitive) name.
    pub fn from_name(name: &str) -> Result<Self> {
        let (key, hexes) = SEQUENCES
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                YellowbrickError::Validation(format!(
                    "'{}' is not a known colormap, choose one of {}",
                    name,
                    colormap_names().join(", ")
                ))
            })?;

        let colors = hexes
            .iter()
            .map(|h| h.parse::<Rgb>())
            .collect::<Result<Vec<_>>>()?;
        Colormap::new(key, colors)
    }

    pub fn with_under(mut self, color: Rgb) -> Self {
        self.under = Some(color);
        self
    }

    pub fn with_over(mut self, color: Rgb) -> Self {
        self.over = Some(color);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn under(&self) -> Rgb {
        self.under.unwrap_or(self.colors[0])
    }

    pub fn over(&self) -> Rgb {
        self.over.unwrap_or(self.colors[self.colors.len() - 1])
    }

    /// Color for a normalized value; out of range values get the under/over colors.
    pub fn color(&self, value: f64) -> Rgb {
        if value.is_nan() || value < 0.0 {
            return self.under();
        }
        if value > 1.0 {
            return self.over();
        }
        let n = self.colors.len();
        let idx = ((value * n as f64).floor() as usize).min(n - 1);
        self.colors[idx]
    }

    /// `n` colors evenly spaced along the colormap.
    pub fn sample(&self, n: usize) -> Vec<Rgb> {
        match n {
            0 => Vec::new(),
            1 => vec![self.color(0.0)],
            _ => (0..n)
                .map(|i| self.color(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

/// Pick a readable text color (dark or light) for the given background.
pub fn find_text_color(base: Rgb) -> Rgb {
    if base.brightness() > 130.0 {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}

/// Resolve `n` colors from explicit colors, a colormap name, or the default palette.
///
/// Explicit colors win over the colormap and are cycled when there are fewer
/// than `n` of them.
pub fn resolve_colors(n: usize, colormap: Option<&str>, colors: Option<&[String]>) -> Result<Vec<Rgb>> {
    if let Some(colors) = colors.filter(|c| !c.is_empty()) {
        if colormap.is_some() {
            log::warn!("both colormap and colors specified; colors will be used");
        }
        let parsed = colors
            .iter()
            .map(|c| c.parse::<Rgb>())
            .collect::<Result<Vec<_>>>()?;
        return Ok(parsed.iter().cycle().take(n).copied().collect());
    }

    if let Some(name) = colormap {
        return Ok(Colormap::from_name(name)?.sample(n));
    }

    let palette = DEFAULT_PALETTE
        .iter()
        .map(|c| c.parse::<Rgb>())
        .collect::<Result<Vec<_>>>()?;
    Ok(palette.iter().cycle().take(n).copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip_and_names() {
        let c: Rgb = "#2a7d4f".parse().unwrap();
        assert_eq!(c, Rgb(0x2a, 0x7d, 0x4f));
        assert_eq!(c.to_hex(), "#2a7d4f");
        assert_eq!("w".parse::<Rgb>().unwrap(), Rgb::WHITE);
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("chartreuse".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_colormap_bounds_use_under_and_over() {
        let cmap = Colormap::from_name("YlOrRd")
            .unwrap()
            .with_under(Rgb::WHITE)
            .with_over(Rgb(0x2a, 0x7d, 0x4f));

        assert_eq!(cmap.color(-0.1), Rgb::WHITE);
        assert_eq!(cmap.color(1.5), Rgb(0x2a, 0x7d, 0x4f));
        assert_eq!(cmap.color(0.0), "#ffffcc".parse().unwrap());
        assert_eq!(cmap.color(1.0), "#800026".parse().unwrap());
    }

    #[test]
    fn test_unknown_colormap_lists_choices() {
        let err = Colormap::from_name("viridis-ish").unwrap_err();
        assert!(err.to_string().contains("YlOrRd"));
    }

    #[test]
    fn test_text_color_contrast() {
        assert_eq!(find_text_color(Rgb::WHITE), Rgb::BLACK);
        assert_eq!(find_text_color(Rgb(0x80, 0x00, 0x26)), Rgb::WHITE);
    }

    #[test]
    fn test_resolve_colors_precedence() {
        let explicit = vec!["#000000".to_string(), "#ffffff".to_string()];
        let colors = resolve_colors(3, Some("Blues"), Some(explicit.as_slice())).unwrap();
        assert_eq!(colors, vec![Rgb::BLACK, Rgb::WHITE, Rgb::BLACK]);

        let sampled = resolve_colors(2, Some("Blues"), None).unwrap();
        assert_eq!(sampled[0], "#f7fbff".parse().unwrap());
        assert_eq!(sampled[1], "#08306b".parse().unwrap());

        let default = resolve_colors(7, None, None).unwrap();
        assert_eq!(default.len(), 7);
        assert_eq!(default[6], default[0]);
    }
}

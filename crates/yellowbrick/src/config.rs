use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, YellowbrickError};

/// A boolean-or-name option as it appears in configuration files.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum OptionArg {
    Flag(bool),
    Name(String),
}

impl From<bool> for OptionArg {
    fn from(flag: bool) -> Self {
        OptionArg::Flag(flag)
    }
}

impl From<&str> for OptionArg {
    fn from(name: &str) -> Self {
        OptionArg::Name(name.to_string())
    }
}

impl fmt::Display for OptionArg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptionArg::Flag(flag) => write!(f, "{}", flag),
            OptionArg::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Whether the estimator wrapped by a score visualizer is already fitted.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "OptionArg", into = "OptionArg")]
pub enum FitState {
    /// Never call the estimator's fit.
    Fitted,
    /// Always call the estimator's fit.
    Unfitted,
    /// Inspect the estimator to decide.
    #[default]
    AutoDetect,
}

impl From<bool> for FitState {
    fn from(fitted: bool) -> Self {
        if fitted {
            FitState::Fitted
        } else {
            FitState::Unfitted
        }
    }
}

impl FromStr for FitState {
    type Err = YellowbrickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "true" | "fitted" => Ok(FitState::Fitted),
            "false" | "unfitted" => Ok(FitState::Unfitted),
            "auto" => Ok(FitState::AutoDetect),
            _ => Err(YellowbrickError::Validation(format!(
                "'{}' is an invalid argument for is_fitted, use true, false, or 'auto'",
                s
            ))),
        }
    }
}

impl TryFrom<OptionArg> for FitState {
    type Error = YellowbrickError;

    fn try_from(arg: OptionArg) -> Result<Self> {
        match arg {
            OptionArg::Flag(flag) => Ok(FitState::from(flag)),
            OptionArg::Name(name) => name.parse(),
        }
    }
}

impl From<FitState> for OptionArg {
    fn from(state: FitState) -> Self {
        match state {
            FitState::Fitted => OptionArg::Flag(true),
            FitState::Unfitted => OptionArg::Flag(false),
            FitState::AutoDetect => OptionArg::Name("auto".to_string()),
        }
    }
}

/// How the support column of a classification report is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Support {
    /// No support column.
    #[default]
    Hidden,
    /// Support column annotated with raw counts.
    Count,
    /// Support column annotated with the fraction of all samples.
    Percent,
}

impl Support {
    pub fn is_displayed(&self) -> bool {
        !matches!(self, Support::Hidden)
    }

    /// Resolve an optional config value; absent means hidden.
    pub fn resolve(arg: Option<&OptionArg>) -> Result<Self> {
        match arg {
            None | Some(OptionArg::Flag(false)) => Ok(Support::Hidden),
            Some(OptionArg::Flag(true)) => Ok(Support::Count),
            Some(OptionArg::Name(name)) => name.parse(),
        }
    }
}

impl FromStr for Support {
    type Err = YellowbrickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "false" => Ok(Support::Hidden),
            "true" | "count" => Ok(Support::Count),
            "percent" => Ok(Support::Percent),
            _ => Err(YellowbrickError::Validation(format!(
                "'{}' is an invalid argument for support, use None, True, False, 'percent', or 'count'",
                s
            ))),
        }
    }
}

/// Part-of-speech tagsets understood by the PosTag visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tagset {
    PennTreebank,
    Universal,
}

impl Tagset {
    pub const CHOICES: [&'static str; 2] = ["penn_treebank", "universal"];

    /// Human readable tagset name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tagset::PennTreebank => "Penn Treebank",
            Tagset::Universal => "Universal Dependencies",
        }
    }
}

impl FromStr for Tagset {
    type Err = YellowbrickError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "penn_treebank" => Ok(Tagset::PennTreebank),
            "universal" => Ok(Tagset::Universal),
            _ => Err(YellowbrickError::Validation(format!(
                "'{}' is an invalid tagset. Please choose one of {}.",
                s,
                Tagset::CHOICES.join(", ")
            ))),
        }
    }
}

/// Options shared by every visualizer.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Overrides the visualizer's default title.
    pub title: Option<String>,
    /// Figure size in pixels.
    pub size: Option<(f64, f64)>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClassificationReportConfig {
    #[serde(flatten)]
    pub base: VisualizerConfig,
    pub classes: Option<Vec<String>>,
    pub cmap: String,
    pub support: Option<OptionArg>,
    pub is_fitted: FitState,
}

impl Default for ClassificationReportConfig {
    fn default() -> Self {
        Self {
            base: VisualizerConfig::default(),
            classes: None,
            cmap: "YlOrRd".to_string(),
            support: None,
            is_fitted: FitState::AutoDetect,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RocAucConfig {
    #[serde(flatten)]
    pub base: VisualizerConfig,
    pub classes: Option<Vec<String>>,
    pub micro: bool,
    #[serde(rename = "macro")]
    pub macro_average: bool,
    pub per_class: bool,
    pub is_fitted: FitState,
}

impl Default for RocAucConfig {
    fn default() -> Self {
        Self {
            base: VisualizerConfig::default(),
            classes: None,
            micro: true,
            macro_average: true,
            per_class: true,
            is_fitted: FitState::AutoDetect,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PosTagConfig {
    #[serde(flatten)]
    pub base: VisualizerConfig,
    pub tagset: String,
    pub colormap: Option<String>,
    pub colors: Option<Vec<String>>,
    /// Order tags from most to least frequent.
    pub frequency: bool,
    /// One stacked bar segment per class; requires `y` at fit time.
    pub stack: bool,
}

impl Default for PosTagConfig {
    fn default() -> Self {
        Self {
            base: VisualizerConfig::default(),
            tagset: "penn_treebank".to_string(),
            colormap: None,
            colors: None,
            frequency: false,
            stack: false,
        }
    }
}

/// Load any visualizer config from a JSON file.
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config = serde_json::from_str(&contents)?;
    Ok(config)
}

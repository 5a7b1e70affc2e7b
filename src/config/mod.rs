//! Chart configuration
//!
//! [`ChartSettings`] is the declarative description handed to
//! [`ChartController::configure`](crate::chart::ChartController::configure):
//! dimensions, the channel → (facet, line) mapping, and display settings for
//! facets, lines and the shared x-axis.
//!
//! # Wire format
//!
//! Settings use camelCase keys. Axis limits are two-element arrays where each
//! bound is a number or `null` ("auto"); TOML, which has no null, may use the
//! string `"auto"` instead.
//!
//! ```json
//! {
//!   "dimensions": { "height": 290, "width": 600 },
//!   "mappings": { "loss": { "facet": "loss", "line": "train" } },
//!   "facetConfig": { "loss": { "name": "Loss", "scale": "linear", "limit": [null, null] } },
//!   "lineConfig": { "train": { "name": "Train", "color": "#F8766D" } },
//!   "xAxisConfig": { "name": "Epoch", "limit": [0, null] }
//! }
//! ```
//!
//! Settings can be parsed from strings ([`ChartSettings::from_json_str`],
//! [`ChartSettings::from_toml_str`]) or files ([`ChartSettings::load`]);
//! all of them validate before returning.

pub mod infer;

pub use infer::{infer_settings, InferOverrides, PartialFacet, PartialLine, PartialTarget, PartialXAxis};

use crate::axis::{AxisLimit, ScaleKind};
use crate::chart::layout::Layout;
use crate::error::{LrCurveError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Default chart width in pixels
pub const DEFAULT_WIDTH: f64 = 600.0;

/// Default height of one facet in pixels
pub const DEFAULT_FACET_HEIGHT: f64 = 200.0;

/// Default train line color
pub const TRAIN_COLOR: &str = "#F8766D";

/// Default validation line color
pub const VALIDATION_COLOR: &str = "#00BFC4";

/// Color for lines without a dedicated default
pub const FALLBACK_COLOR: &str = "#333333";

/// Chart size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub height: f64,
    pub width: f64,
}

impl Dimensions {
    /// Default size for a chart with `facets` stacked sub-plots
    pub fn for_facets(facets: usize) -> Self {
        Self {
            height: facets as f64 * DEFAULT_FACET_HEIGHT + Layout::RESERVED_HEIGHT,
            width: DEFAULT_WIDTH,
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::for_facets(1)
    }
}

/// The (facet, line) pair a channel feeds
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelTarget {
    pub facet: String,
    pub line: String,
}

impl ChannelTarget {
    pub fn new(facet: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            facet: facet.into(),
            line: line.into(),
        }
    }
}

impl std::fmt::Display for ChannelTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.facet, self.line)
    }
}

/// Channel key → target pair
pub type ChannelMapping = BTreeMap<String, ChannelTarget>;

/// Display settings of one facet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetConfig {
    /// Label shown in the facet strip
    pub name: String,
    #[serde(default)]
    pub scale: ScaleKind,
    /// y-axis limit
    #[serde(default)]
    pub limit: AxisLimit,
}

impl FacetConfig {
    pub fn new(name: impl Into<String>, scale: ScaleKind, limit: AxisLimit) -> Self {
        Self {
            name: name.into(),
            scale,
            limit,
        }
    }
}

/// Display settings of one line, shared by every facet it appears in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConfig {
    pub name: String,
    /// Any SVG color
    pub color: String,
}

impl LineConfig {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Shared x-axis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisConfig {
    #[serde(default = "default_x_name")]
    pub name: String,
    #[serde(default = "default_x_limit")]
    pub limit: AxisLimit,
}

fn default_x_name() -> String {
    "Epoch".to_string()
}

fn default_x_limit() -> AxisLimit {
    AxisLimit::from_lower(0.0)
}

impl Default for XAxisConfig {
    fn default() -> Self {
        Self {
            name: default_x_name(),
            limit: default_x_limit(),
        }
    }
}

/// Complete chart configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    #[serde(default)]
    pub dimensions: Dimensions,
    pub mappings: ChannelMapping,
    pub facet_config: BTreeMap<String, FacetConfig>,
    pub line_config: BTreeMap<String, LineConfig>,
    #[serde(default)]
    pub x_axis_config: XAxisConfig,
}

impl Default for ChartSettings {
    fn default() -> Self {
        let mut mappings = ChannelMapping::new();
        mappings.insert("loss".to_string(), ChannelTarget::new("loss", "train"));
        mappings.insert("val_loss".to_string(), ChannelTarget::new("loss", "validation"));

        let mut facet_config = BTreeMap::new();
        facet_config.insert(
            "loss".to_string(),
            FacetConfig::new("loss", ScaleKind::Linear, AxisLimit::from_lower(0.0)),
        );

        let mut line_config = BTreeMap::new();
        line_config.insert("train".to_string(), LineConfig::new("Train", TRAIN_COLOR));
        line_config.insert(
            "validation".to_string(),
            LineConfig::new("Validation", VALIDATION_COLOR),
        );

        Self {
            dimensions: Dimensions::for_facets(1),
            mappings,
            facet_config,
            line_config,
            x_axis_config: XAxisConfig::default(),
        }
    }
}

fn validate_limit(what: &str, limit: &AxisLimit, scale: ScaleKind) -> Result<()> {
    for bound in limit.fixed_bounds() {
        if !bound.is_finite() {
            return Err(LrCurveError::Config(format!(
                "{what} limit {limit} has a non-finite bound"
            )));
        }
        if scale == ScaleKind::Log10 && bound <= 0.0 {
            return Err(LrCurveError::Config(format!(
                "{what} uses a log10 scale but limit {limit} has a non-positive bound"
            )));
        }
    }
    if let (Some(lower), Some(upper)) = (limit.lower, limit.upper) {
        if lower >= upper {
            return Err(LrCurveError::Config(format!(
                "{what} limit {limit} must have lower < upper"
            )));
        }
    }
    Ok(())
}

impl ChartSettings {
    /// Check the settings without touching any chart state.
    pub fn validate(&self) -> Result<()> {
        let Dimensions { width, height } = self.dimensions;
        if !(width.is_finite() && width > 0.0) || !(height.is_finite() && height > 0.0) {
            return Err(LrCurveError::Config(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }

        if self.mappings.is_empty() {
            return Err(LrCurveError::Config(
                "at least one channel mapping is required".to_string(),
            ));
        }

        for (channel, target) in &self.mappings {
            if !self.facet_config.contains_key(&target.facet) {
                return Err(LrCurveError::Config(format!(
                    "mapping '{channel}' references unknown facet '{}'",
                    target.facet
                )));
            }
            if !self.line_config.contains_key(&target.line) {
                return Err(LrCurveError::Config(format!(
                    "mapping '{channel}' references unknown line '{}'",
                    target.line
                )));
            }
        }

        for (key, facet) in &self.facet_config {
            validate_limit(&format!("facet '{key}'"), &facet.limit, facet.scale)?;
        }
        validate_limit("x-axis", &self.x_axis_config.limit, ScaleKind::Linear)?;

        Layout::compute(&self.dimensions, self.facet_order().len()).map(|_| ())
    }

    /// Facets referenced by the mapping, sorted by key
    pub fn facet_order(&self) -> Vec<&str> {
        self.mappings
            .values()
            .map(|t| t.facet.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Lines plotted in `facet`, sorted by key
    pub fn lines_for_facet(&self, facet: &str) -> Vec<&str> {
        self.mappings
            .values()
            .filter(|t| t.facet == facet)
            .map(|t| t.line.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Lines referenced by any mapping, sorted by key
    pub fn line_order(&self) -> Vec<&str> {
        self.mappings
            .values()
            .map(|t| t.line.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Parse and validate JSON settings
    pub fn from_json_str(content: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(content).map_err(|e| {
            LrCurveError::Serialization(format!("Failed to parse JSON settings: {}", e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate TOML settings
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content).map_err(|e| {
            LrCurveError::Serialization(format!("Failed to parse TOML settings: {}", e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a `.json` or `.toml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            _ => {
                return Err(LrCurveError::Config(format!(
                    "Unsupported settings file {:?}: expected .json or .toml",
                    path
                )))
            }
        };

        let content = std::fs::read_to_string(path)
            .map_err(LrCurveError::from)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let settings = parse(&content).with_context(|| format!("Invalid settings file {:?}", path))?;
        tracing::debug!(
            "Loaded settings from {:?}: {} mappings, {} facets",
            path,
            settings.mappings.len(),
            settings.facet_config.len()
        );
        Ok(settings)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LrCurveError::Serialization(format!("Failed to serialize settings: {}", e))
        })
    }
}

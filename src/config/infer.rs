//! Settings inference from observed metric names
//!
//! Training loops usually know which metrics they log but not how to chart
//! them. [`infer_settings`] fills in whatever the caller leaves out:
//!
//! - `val_<name>` feeds facet `<name>`, line `validation`; anything else
//!   feeds facet `<name>`, line `train`
//! - `train`/`validation` lines get their usual names and colors
//! - well-known facets (`loss`, accuracy variants, `lr`) get a label, limit
//!   and scale; unknown ones are auto-ranged and linear
//! - a known epoch count pins an auto x-axis upper bound to the last epoch

use super::{
    ChannelMapping, ChannelTarget, ChartSettings, Dimensions, FacetConfig, LineConfig,
    XAxisConfig, DEFAULT_WIDTH, FALLBACK_COLOR, TRAIN_COLOR, VALIDATION_COLOR,
};
use crate::axis::{AxisLimit, ScaleKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const ACCURACY_KEYS: [&str; 5] = [
    "acc",
    "accuracy",
    "binary_accuracy",
    "categorical_accuracy",
    "sparse_categorical_accuracy",
];

/// Mapping entry with optional fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialTarget {
    pub facet: Option<String>,
    pub line: Option<String>,
}

/// Line settings with optional fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialLine {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Facet settings with optional fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialFacet {
    pub name: Option<String>,
    pub scale: Option<ScaleKind>,
    pub limit: Option<AxisLimit>,
}

/// X-axis settings with optional fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialXAxis {
    pub name: Option<String>,
    pub limit: Option<AxisLimit>,
}

/// Caller-provided settings that take precedence over inferred ones
///
/// A table that is present fixes the set of keys: e.g. with `line_config`
/// given, only the listed lines are configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferOverrides {
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub mappings: Option<BTreeMap<String, PartialTarget>>,
    pub line_config: Option<BTreeMap<String, PartialLine>>,
    pub facet_config: Option<BTreeMap<String, PartialFacet>>,
    pub x_axis_config: Option<PartialXAxis>,
}

impl InferOverrides {
    /// Whether the caller pinned the channel mapping
    pub fn has_mappings(&self) -> bool {
        self.mappings.is_some()
    }
}

fn infer_target(channel: &str, partial: &PartialTarget) -> ChannelTarget {
    let (facet, line) = match channel.strip_prefix("val_") {
        Some(base) => (base, "validation"),
        None => (channel, "train"),
    };
    ChannelTarget {
        facet: partial.facet.clone().unwrap_or_else(|| facet.to_string()),
        line: partial.line.clone().unwrap_or_else(|| line.to_string()),
    }
}

fn infer_line(key: &str, partial: &PartialLine) -> LineConfig {
    let (name, color) = match key {
        "train" => ("Train", TRAIN_COLOR),
        "validation" => ("Validation", VALIDATION_COLOR),
        other => (other, FALLBACK_COLOR),
    };
    LineConfig {
        name: partial.name.clone().unwrap_or_else(|| name.to_string()),
        color: partial.color.clone().unwrap_or_else(|| color.to_string()),
    }
}

fn infer_facet(key: &str, partial: &PartialFacet) -> FacetConfig {
    let (name, limit, scale) = match key {
        "loss" => ("Loss", AxisLimit::auto(), ScaleKind::Log10),
        k if ACCURACY_KEYS.contains(&k) => ("Accuracy", AxisLimit::fixed(0.0, 1.0), ScaleKind::Linear),
        "lr" => ("Learning Rate", AxisLimit::from_lower(0.0), ScaleKind::Linear),
        other => (other, AxisLimit::auto(), ScaleKind::Linear),
    };
    FacetConfig {
        name: partial.name.clone().unwrap_or_else(|| name.to_string()),
        scale: partial.scale.unwrap_or(scale),
        limit: partial.limit.unwrap_or(limit),
    }
}

fn infer_x_axis(partial: Option<&PartialXAxis>, epochs: Option<u64>) -> XAxisConfig {
    let defaults = XAxisConfig::default();
    let mut limit = partial.and_then(|p| p.limit).unwrap_or(defaults.limit);
    if let (None, Some(epochs)) = (limit.upper, epochs) {
        if epochs > 1 {
            limit.upper = Some((epochs - 1) as f64);
        }
    }
    XAxisConfig {
        name: partial
            .and_then(|p| p.name.clone())
            .unwrap_or(defaults.name),
        limit,
    }
}

/// Build complete settings for the observed metrics.
///
/// `observed` is ignored when the overrides pin the mapping. The result is
/// not validated; `configure` does that.
pub fn infer_settings<'a>(
    observed: impl IntoIterator<Item = &'a str>,
    overrides: &InferOverrides,
    epochs: Option<u64>,
) -> ChartSettings {
    let partial_mappings: BTreeMap<String, PartialTarget> = match &overrides.mappings {
        Some(mappings) => mappings.clone(),
        None => observed
            .into_iter()
            .map(|key| (key.to_string(), PartialTarget::default()))
            .collect(),
    };
    let mappings: ChannelMapping = partial_mappings
        .iter()
        .map(|(channel, partial)| (channel.clone(), infer_target(channel, partial)))
        .collect();

    let line_config = match &overrides.line_config {
        Some(lines) => lines
            .iter()
            .map(|(key, partial)| (key.clone(), infer_line(key, partial)))
            .collect(),
        None => mappings
            .values()
            .map(|t| t.line.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|key| (key.to_string(), infer_line(key, &PartialLine::default())))
            .collect(),
    };

    let facet_config: BTreeMap<String, FacetConfig> = match &overrides.facet_config {
        Some(facets) => facets
            .iter()
            .map(|(key, partial)| (key.clone(), infer_facet(key, partial)))
            .collect(),
        None => mappings
            .values()
            .map(|t| t.facet.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|key| (key.to_string(), infer_facet(key, &PartialFacet::default())))
            .collect(),
    };

    let defaults = Dimensions::for_facets(facet_config.len());
    let dimensions = Dimensions {
        height: overrides.height.unwrap_or(defaults.height),
        width: overrides.width.unwrap_or(DEFAULT_WIDTH),
    };

    ChartSettings {
        dimensions,
        mappings,
        facet_config,
        line_config,
        x_axis_config: infer_x_axis(overrides.x_axis_config.as_ref(), epochs),
    }
}

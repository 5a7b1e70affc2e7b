//! Core data types for lrcurve-rs
//!
//! This module contains the fundamental data structures used throughout
//! the engine for representing streamed samples and accumulated series.
//!
//! # Main Types
//!
//! - [`DataPoint`] - A single `{x, y}` point of one series
//! - [`Sample`] - One streamed row: an x value plus a channel → value map
//! - [`SeriesBuffer`] - Append-only point storage for one (facet, line) pair
//! - [`Extent`] - Observed min/max of a set of values
//!
//! # Running extents
//!
//! [`SeriesBuffer`] keeps its x and y extents up to date as points arrive, so
//! resolving an auto axis bound costs O(number of buffers) per frame rather
//! than a scan over every accumulated point. Non-finite values are stored
//! (the renderer decides what to do with them) but never widen an extent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single point of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Position along the shared x-axis (typically the epoch or step)
    pub x: f64,
    /// Measured value
    pub y: f64,
}

impl DataPoint {
    /// Create a new data point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One streamed row
///
/// On the wire a sample is the two-element array `[x, {channel: value, ...}]`.
/// Channels the chart does not know about are ignored when appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(f64, BTreeMap<String, f64>)",
    into = "(f64, BTreeMap<String, f64>)"
)]
pub struct Sample {
    /// Position along the shared x-axis
    pub x: f64,
    /// Values keyed by channel
    pub y: BTreeMap<String, f64>,
}

impl Sample {
    /// Create a sample with no channel values
    pub fn new(x: f64) -> Self {
        Self {
            x,
            y: BTreeMap::new(),
        }
    }

    /// Add a channel value
    pub fn with(mut self, channel: impl Into<String>, value: f64) -> Self {
        self.y.insert(channel.into(), value);
        self
    }

    /// Parse a JSON array of rows (`[[x, {...}], ...]`)
    pub fn rows_from_json(rows: &str) -> serde_json::Result<Vec<Sample>> {
        serde_json::from_str(rows)
    }
}

impl From<(f64, BTreeMap<String, f64>)> for Sample {
    fn from((x, y): (f64, BTreeMap<String, f64>)) -> Self {
        Self { x, y }
    }
}

impl From<Sample> for (f64, BTreeMap<String, f64>) {
    fn from(sample: Sample) -> Self {
        (sample.x, sample.y)
    }
}

/// Observed minimum and maximum of a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Smallest observed value
    pub min: f64,
    /// Largest observed value
    pub max: f64,
}

impl Extent {
    /// Extent of a single value, `None` if the value is not finite
    pub fn point(value: f64) -> Option<Self> {
        value.is_finite().then_some(Self {
            min: value,
            max: value,
        })
    }

    /// Extent over an iterator, skipping non-finite values
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .fold(None, |acc: Option<Extent>, v| match (acc, Extent::point(v)) {
                (Some(e), Some(p)) => Some(e.union(p)),
                (None, p) => p,
                (e, None) => e,
            })
    }

    /// Smallest extent covering both
    pub fn union(self, other: Extent) -> Extent {
        Extent {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Merge two optional extents
    pub fn merge(a: Option<Extent>, b: Option<Extent>) -> Option<Extent> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Widen to include a value; non-finite values are ignored
    pub fn include(extent: &mut Option<Extent>, value: f64) {
        *extent = Extent::merge(*extent, Extent::point(value));
    }
}

/// Append-only storage for one (facet, line) pair
///
/// Points keep arrival order. The buffer tracks running extents:
/// x over all points, y over all points, and y over strictly positive values
/// (the latter feeds logarithmic axes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesBuffer {
    points: Vec<DataPoint>,
    x_extent: Option<Extent>,
    y_extent: Option<Extent>,
    positive_y_extent: Option<Extent>,
}

impl SeriesBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point
    pub fn push(&mut self, point: DataPoint) {
        Extent::include(&mut self.x_extent, point.x);
        Extent::include(&mut self.y_extent, point.y);
        if point.y > 0.0 {
            Extent::include(&mut self.positive_y_extent, point.y);
        }
        self.points.push(point);
    }

    /// Points in arrival order
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no point has been appended
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point
    pub fn last(&self) -> Option<&DataPoint> {
        self.points.last()
    }

    /// Extent of the x values
    pub fn x_extent(&self) -> Option<Extent> {
        self.x_extent
    }

    /// Extent of the y values; `positive_only` restricts it to values > 0
    pub fn y_extent(&self, positive_only: bool) -> Option<Extent> {
        if positive_only {
            self.positive_y_extent
        } else {
            self.y_extent
        }
    }
}

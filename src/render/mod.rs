//! Rendering collaborator interface
//!
//! The chart engine decides *what* to draw; a [`RenderBackend`] decides how.
//! Every call describes a complete visual for one slot (a facet, one of its
//! axes, one of its lines, a text label or the legend) and replaces whatever
//! the backend previously held for that slot. [`RenderBackend::clear`] removes
//! everything and must be safe to call repeatedly.
//!
//! [`DrawList`] is the bundled backend: it retains the latest visual per slot
//! and renders the scene to SVG on demand.

pub mod draw_list;
pub mod svg;

pub use draw_list::{AxisSnapshot, DrawList, PathSnapshot, RenderStats, Scene};

use crate::axis::{AxisTicks, PixelMapping};
use crate::error::Result;
use crate::types::DataPoint;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in chart pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Which axis of a facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Shared x-axis along the bottom
    Horizontal,
    /// Per-facet y-axis along the left
    Vertical,
}

/// A facet's static frame, mounted once per configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FacetFrame {
    pub facet: String,
    pub index: usize,
    pub graph: Rect,
    pub plot: Rect,
    pub strip: Rect,
}

/// One axis with its grid
#[derive(Debug, Clone, Copy)]
pub struct AxisVisual<'a> {
    pub facet: &'a str,
    pub orientation: Orientation,
    pub ticks: &'a AxisTicks,
    /// Area the domain maps onto
    pub plot: Rect,
    /// Area grid lines span
    pub graph: Rect,
    /// Whether tick labels are shown
    pub show_labels: bool,
}

/// A series line: points in arrival order plus their projection
#[derive(Debug, Clone, Copy)]
pub struct PathVisual<'a> {
    pub facet: &'a str,
    pub line: &'a str,
    pub color: &'a str,
    pub points: &'a [DataPoint],
    pub mapping: &'a PixelMapping,
}

/// Horizontal alignment of text along its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

/// Straight baseline for text, from `start` to `end`
///
/// Text follows the direction of the segment, so a top-to-bottom baseline
/// yields rotated text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl Baseline {
    pub fn horizontal(start: (f64, f64), length: f64) -> Self {
        Self {
            start,
            end: (start.0 + length, start.1),
        }
    }

    pub fn vertical(start: (f64, f64), length: f64) -> Self {
        Self {
            start,
            end: (start.0, start.1 + length),
        }
    }

    /// Point at fraction `t` along the segment
    pub fn at(&self, t: f64) -> (f64, f64) {
        (
            self.start.0 + t * (self.end.0 - self.start.0),
            self.start.1 + t * (self.end.1 - self.start.1),
        )
    }
}

/// Descriptive text (facet labels, x-axis label)
#[derive(Debug, Clone, PartialEq)]
pub struct TextVisual {
    /// Slot identifier; drawing the same id again replaces the text
    pub id: String,
    pub text: String,
    pub baseline: Baseline,
    pub anchor: TextAnchor,
}

/// One legend entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub name: String,
    pub color: String,
}

/// Legend band, entries in line order
#[derive(Debug, Clone, PartialEq)]
pub struct LegendVisual {
    pub area: Rect,
    pub entries: Vec<LegendEntry>,
}

/// Drawing layer the chart engine renders through
pub trait RenderBackend {
    /// Remove every visual; idempotent
    fn clear(&mut self) -> Result<()>;

    /// Size of the drawing surface
    fn set_canvas(&mut self, width: f64, height: f64) -> Result<()>;

    /// Mount a facet's background and label strip
    fn mount_facet(&mut self, frame: &FacetFrame) -> Result<()>;

    /// Draw or replace one axis of a facet
    fn draw_axis(&mut self, axis: &AxisVisual<'_>) -> Result<()>;

    /// Draw or replace one line of a facet
    fn draw_path(&mut self, path: &PathVisual<'_>) -> Result<()>;

    /// Draw or replace a text label
    fn draw_text(&mut self, text: &TextVisual) -> Result<()>;

    /// Draw or replace the legend
    fn draw_legend(&mut self, legend: &LegendVisual) -> Result<()>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn set_canvas(&mut self, width: f64, height: f64) -> Result<()> {
        (**self).set_canvas(width, height)
    }

    fn mount_facet(&mut self, frame: &FacetFrame) -> Result<()> {
        (**self).mount_facet(frame)
    }

    fn draw_axis(&mut self, axis: &AxisVisual<'_>) -> Result<()> {
        (**self).draw_axis(axis)
    }

    fn draw_path(&mut self, path: &PathVisual<'_>) -> Result<()> {
        (**self).draw_path(path)
    }

    fn draw_text(&mut self, text: &TextVisual) -> Result<()> {
        (**self).draw_text(text)
    }

    fn draw_legend(&mut self, legend: &LegendVisual) -> Result<()> {
        (**self).draw_legend(legend)
    }
}

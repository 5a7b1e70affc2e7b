//! Chart geometry
//!
//! Facets are stacked vertically and share the full width. Below them the
//! chart reserves fixed bands for the x-axis tick labels, the x-axis label and
//! the legend:
//!
//! ```text
//! +-------------------------------------------+
//! | facet 0:  [ y | plot area        ][strip] |
//! | facet 1:  [ y | plot area        ][strip] |
//! |            x-axis ticks (30)              |
//! |            x label (20)                   |
//! |            legend (40)                    |
//! +-------------------------------------------+
//! ```

use crate::config::Dimensions;
use crate::error::{LrCurveError, Result};
use crate::render::{Baseline, Rect};

/// Space around each facet graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Outer margin of a facet graph; the left side holds y tick labels
pub const MARGIN: Insets = Insets {
    top: 10.0,
    right: 10.0,
    bottom: 10.0,
    left: 35.0,
};

/// Padding between the graph background and the plotted axis range
pub const AXIS_MARGIN: Insets = Insets {
    top: 10.0,
    right: 15.0,
    bottom: 10.0,
    left: 15.0,
};

/// Width of the facet label strip
pub const FACET_WIDTH: f64 = 30.0;
pub const LEGEND_HEIGHT: f64 = 40.0;
pub const X_AXIS_HEIGHT: f64 = 30.0;
pub const X_LABEL_HEIGHT: f64 = 20.0;

/// Geometry of one facet, in chart coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacetGeometry {
    /// Graph background, including axis padding
    pub graph: Rect,
    /// Area the axis domains map onto
    pub plot: Rect,
    /// Label strip on the right of the graph
    pub strip: Rect,
}

/// Geometry of the whole chart
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub facets: Vec<FacetGeometry>,
    /// Baseline of the x-axis label, spanning the x-axis width
    pub x_label: Baseline,
    /// Legend band
    pub legend: Rect,
}

impl Layout {
    /// Height reserved below the facets
    pub const RESERVED_HEIGHT: f64 = LEGEND_HEIGHT + X_LABEL_HEIGHT + X_AXIS_HEIGHT;

    /// Lay out `facet_count` stacked facets; fails when any plot area would
    /// be empty.
    pub fn compute(dimensions: &Dimensions, facet_count: usize) -> Result<Self> {
        let Dimensions { width, height } = *dimensions;
        if facet_count == 0 {
            return Err(LrCurveError::Config("no facet to lay out".to_string()));
        }

        let inner_height = height - Self::RESERVED_HEIGHT;
        if inner_height <= 0.0 {
            return Err(LrCurveError::Config(format!(
                "height {height} leaves no room for facets, need more than {}",
                Self::RESERVED_HEIGHT
            )));
        }

        let step = inner_height / facet_count as f64;
        let facet_height = step.round();
        let graph_width = width - FACET_WIDTH - MARGIN.left - MARGIN.right;
        let graph_height = facet_height - MARGIN.top - MARGIN.bottom;
        let plot_width = graph_width - AXIS_MARGIN.left - AXIS_MARGIN.right;
        let plot_height = graph_height - AXIS_MARGIN.top - AXIS_MARGIN.bottom;

        if plot_width <= 0.0 || plot_height <= 0.0 {
            return Err(LrCurveError::Config(format!(
                "{width}x{height} is too small for {facet_count} facet(s), plot area would be {plot_width}x{plot_height}"
            )));
        }

        let facets = (0..facet_count)
            .map(|index| {
                let top = index as f64 * step + MARGIN.top;
                FacetGeometry {
                    graph: Rect::new(MARGIN.left, top, graph_width, graph_height),
                    plot: Rect::new(
                        MARGIN.left + AXIS_MARGIN.left,
                        top + AXIS_MARGIN.top,
                        plot_width,
                        plot_height,
                    ),
                    strip: Rect::new(MARGIN.left + graph_width, top, FACET_WIDTH, graph_height),
                }
            })
            .collect();

        let after_facets = height - LEGEND_HEIGHT - X_LABEL_HEIGHT;
        let band_width = width - MARGIN.left - MARGIN.right;
        let x_axis_width = band_width - FACET_WIDTH;

        tracing::debug!(
            "Layout {}x{}: {} facet(s) of {}px, plot area {}x{}",
            width,
            height,
            facet_count,
            facet_height,
            plot_width,
            plot_height
        );

        Ok(Self {
            width,
            height,
            facets,
            x_label: Baseline::horizontal((MARGIN.left, after_facets), x_axis_width),
            legend: Rect::new(MARGIN.left, after_facets + X_LABEL_HEIGHT, band_width, LEGEND_HEIGHT),
        })
    }
}

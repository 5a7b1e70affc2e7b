//! Per-facet sub-plot state

use crate::axis::{
    compute_axis_ticks, resolve_domain, AxisLimit, AxisTicks, PadSide, PixelMapping,
    ResolvedDomain, ScaleKind, TickPolicy,
};
use crate::chart::layout::FacetGeometry;
use crate::error::Result;
use crate::render::{FacetFrame, Orientation};
use crate::types::Extent;

/// Domain and tick state of one axis
///
/// Ticks are only regenerated when the resolved domain changes, so a redraw
/// with unchanged data leaves the axis untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisState {
    limit: AxisLimit,
    kind: ScaleKind,
    policy: TickPolicy,
    resolved: Option<ResolvedDomain>,
    ticks: Option<AxisTicks>,
}

impl AxisState {
    pub fn new(limit: AxisLimit, kind: ScaleKind, policy: TickPolicy) -> Self {
        Self {
            limit,
            kind,
            policy,
            resolved: None,
            ticks: None,
        }
    }

    pub fn limit(&self) -> &AxisLimit {
        &self.limit
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    /// Whether this axis follows the data
    pub fn is_dynamic(&self) -> bool {
        self.limit.is_dynamic()
    }

    /// Log axes only take positive values into account
    pub fn positive_only(&self) -> bool {
        self.kind == ScaleKind::Log10
    }

    pub fn resolved(&self) -> Option<&ResolvedDomain> {
        self.resolved.as_ref()
    }

    /// Ticks of the last drawable domain
    pub fn ticks(&self) -> Option<&AxisTicks> {
        self.ticks.as_ref()
    }

    /// Forget the resolved domain; the next refresh reports a change.
    pub fn invalidate(&mut self) {
        self.resolved = None;
        self.ticks = None;
    }

    /// Re-resolve against `observed`; returns whether the domain changed.
    pub fn refresh(&mut self, observed: Option<Extent>) -> Result<bool> {
        let resolved = resolve_domain(&self.limit, observed);
        if self.resolved == Some(resolved) {
            return Ok(false);
        }

        self.ticks = match resolved.bounds() {
            Some(bounds) => Some(compute_axis_ticks(
                self.kind,
                bounds,
                self.policy,
                PadSide::for_limit(&self.limit),
            )?),
            None => None,
        };
        self.resolved = Some(resolved);
        if let Some(ticks) = &self.ticks {
            tracing::trace!(
                "Axis domain changed to [{}, {}], {} major ticks",
                ticks.domain.0,
                ticks.domain.1,
                ticks.major.len()
            );
        }
        Ok(true)
    }
}

/// One facet: its geometry, plotted lines and y-axis
#[derive(Debug, Clone, PartialEq)]
pub struct SubPlot {
    pub facet: String,
    pub label: String,
    pub index: usize,
    pub geometry: FacetGeometry,
    /// Line keys in draw order
    pub lines: Vec<String>,
    pub y_axis: AxisState,
    /// Whether this facet shows the x tick labels
    pub owns_x_axis: bool,
}

impl SubPlot {
    pub fn frame(&self) -> FacetFrame {
        FacetFrame {
            facet: self.facet.clone(),
            index: self.index,
            graph: self.geometry.graph,
            plot: self.geometry.plot,
            strip: self.geometry.strip,
        }
    }

    /// Projection for this facet, once both axes have ticks
    pub fn pixel_mapping(&self, x_axis: &AxisState) -> Result<Option<PixelMapping>> {
        let (Some(x_ticks), Some(y_ticks)) = (x_axis.ticks(), self.y_axis.ticks()) else {
            return Ok(None);
        };
        let plot = self.geometry.plot;
        Ok(Some(PixelMapping {
            x: x_ticks.scale((0.0, plot.width))?,
            y: y_ticks.scale((plot.height, 0.0))?,
            origin: (plot.x, plot.y),
        }))
    }

    /// Whether the given axis of this facet carries tick labels
    pub fn shows_labels(&self, orientation: Orientation) -> bool {
        match orientation {
            Orientation::Horizontal => self.owns_x_axis,
            Orientation::Vertical => true,
        }
    }
}

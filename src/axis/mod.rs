//! Axis domain engine
//!
//! Pure functions that turn a configured [`AxisLimit`] and the observed data
//! extent into a drawable domain, plus the tick positions derived from it:
//!
//! 1. [`resolve_domain`] substitutes auto bounds with observed min/max
//! 2. [`expand_to_nice_domain`] widens the result to round boundaries
//! 3. [`major_ticks`] picks labeled tick values inside the nice domain
//! 4. [`minor_grid_ticks`] subdivides them for the background grid
//!
//! [`compute_axis_ticks`] runs steps 2-4 under a [`TickPolicy`]. All steps are
//! deterministic, so redrawing with unchanged data yields identical ticks.

pub mod domain;
pub mod grid;
pub mod scale;
pub mod ticks;

pub use domain::{resolve_domain, AxisLimit, PadSide, ResolvedDomain};
pub use grid::{highest_minor_mod, minor_grid_ticks};
pub use scale::{AxisScale, LinearScale, LogScale, PixelMapping, Scale, ScaleError, ScaleKind};
pub use ticks::{linear_ticks, nice_linear, tick_increment};

/// Target tick density of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPolicy {
    /// Approximate number of labeled major ticks
    pub major_count: usize,
    /// Upper bound on the number of grid lines
    pub grid_max: usize,
}

/// Shared x-axis: about 6 major ticks, at most 19 grid lines
pub const X_TICK_POLICY: TickPolicy = TickPolicy {
    major_count: 6,
    grid_max: 19,
};

/// Per-facet y-axis: about 3 major ticks, at most 9 grid lines
pub const Y_TICK_POLICY: TickPolicy = TickPolicy {
    major_count: 3,
    grid_max: 9,
};

/// Everything needed to draw one axis and its grid
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTicks {
    pub kind: ScaleKind,
    /// Nice domain, ascending
    pub domain: (f64, f64),
    /// Labeled tick values
    pub major: Vec<f64>,
    /// Labels parallel to `major`; `None` for ticks drawn without a label
    pub labels: Vec<Option<String>>,
    /// Grid line positions, majors included
    pub grid: Vec<f64>,
}

impl AxisTicks {
    /// Whether a grid position coincides with a major tick
    pub fn is_major(&self, value: f64) -> bool {
        self.major.contains(&value)
    }

    /// Scale over the nice domain with the given pixel range
    pub fn scale(&self, range: (f64, f64)) -> Result<AxisScale, ScaleError> {
        AxisScale::new(self.kind, self.domain, range)
    }
}

/// Pad a zero-width domain so it can be drawn, moving only the `pad` side.
fn pad_degenerate(kind: ScaleKind, (lo, hi): (f64, f64), pad: PadSide) -> (f64, f64) {
    if lo < hi {
        return (lo, hi);
    }
    let (below, above) = match kind {
        ScaleKind::Linear => {
            let padding = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
            (lo - padding, hi + padding)
        }
        ScaleKind::Log10 => (lo / 10.0, hi * 10.0),
    };
    match pad {
        PadSide::Both => (below, above),
        PadSide::Upper => (lo, above),
        PadSide::Lower => (below, hi),
    }
}

/// Widen `domain` outward to round boundaries for about `count` ticks.
///
/// Zero-width domains are padded first, on the side given by `pad`. Log
/// domains must be positive.
pub fn expand_to_nice_domain(
    kind: ScaleKind,
    domain: (f64, f64),
    count: usize,
    pad: PadSide,
) -> Result<(f64, f64), ScaleError> {
    let mut scale = AxisScale::new(kind, pad_degenerate(kind, domain, pad), (0.0, 1.0))?;
    scale.nice(count);
    Ok(scale.domain())
}

/// Labeled tick values inside an already nice domain.
pub fn major_ticks(
    kind: ScaleKind,
    nice_domain: (f64, f64),
    count: usize,
) -> Result<Vec<f64>, ScaleError> {
    Ok(AxisScale::new(kind, nice_domain, (0.0, 1.0))?.ticks(count))
}

/// Nice domain, major ticks, labels and grid positions for a raw domain.
pub fn compute_axis_ticks(
    kind: ScaleKind,
    domain: (f64, f64),
    policy: TickPolicy,
    pad: PadSide,
) -> Result<AxisTicks, ScaleError> {
    let nice = expand_to_nice_domain(kind, domain, policy.major_count, pad)?;
    let scale = AxisScale::new(kind, nice, (0.0, 1.0))?;
    let major = scale.ticks(policy.major_count);
    let labels = major
        .iter()
        .map(|&v| scale.tick_label(v, policy.major_count, major.len()))
        .collect();
    let grid = minor_grid_ticks(&major, policy.grid_max);

    Ok(AxisTicks {
        kind,
        domain: nice,
        major,
        labels,
        grid,
    })
}

//! Axis scale transformations.
//!
//! A scale maps a numeric domain onto a pixel range and knows how to widen
//! its domain to round boundaries and pick tick values. [`AxisScale`] is the
//! tagged variant the chart works with; it dispatches to [`LinearScale`] or
//! [`LogScale`] according to the facet's [`ScaleKind`].

use super::ticks::{linear_ticks, nice_linear, tick_increment};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scale kind of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    Log10,
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleKind::Linear => write!(f, "linear"),
            ScaleKind::Log10 => write!(f, "log10"),
        }
    }
}

/// Errors raised when a domain cannot back a scale
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ScaleError {
    #[error("log10 scale requires a positive domain, got [{lower}, {upper}]")]
    NonPositiveDomain { lower: f64, upper: f64 },

    #[error("scale domain must be finite, got [{lower}, {upper}]")]
    NonFiniteDomain { lower: f64, upper: f64 },
}

/// Trait for axis scale transformations.
pub trait Scale: fmt::Debug {
    /// Scale kind implemented by this type
    fn kind(&self) -> ScaleKind;

    /// Current data domain
    fn domain(&self) -> (f64, f64);

    /// Output pixel range
    fn range(&self) -> (f64, f64);

    /// Map a data value into the pixel range; `None` when the value has no
    /// position on this scale.
    fn to_pixel(&self, value: f64) -> Option<f64>;

    /// Widen the domain outward to round boundaries.
    fn nice(&mut self, count: usize);

    /// Tick values for roughly `count` intervals, ascending.
    fn ticks(&self, count: usize) -> Vec<f64>;

    /// Label for a tick, `None` when the tick should stay unlabeled.
    fn tick_label(&self, value: f64, count: usize, total: usize) -> Option<String>;
}

fn check_finite(lower: f64, upper: f64) -> Result<(), ScaleError> {
    if lower.is_finite() && upper.is_finite() {
        Ok(())
    } else {
        Err(ScaleError::NonFiniteDomain { lower, upper })
    }
}

fn interpolate(range: (f64, f64), t: f64) -> f64 {
    range.0 + t * (range.1 - range.0)
}

/// Exact power of ten for integral exponents.
fn pow10(exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() < i32::MAX as f64 {
        10f64.powi(exponent as i32)
    } else {
        10f64.powf(exponent)
    }
}

/// A linear scale for axis transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self, ScaleError> {
        check_finite(domain.0, domain.1)?;
        Ok(Self { domain, range })
    }
}

impl Scale for LinearScale {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Linear
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn to_pixel(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return Some(interpolate(self.range, 0.5));
        }
        Some(interpolate(self.range, (value - self.domain.0) / span))
    }

    fn nice(&mut self, count: usize) {
        self.domain = nice_linear(self.domain.0, self.domain.1, count);
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain.0, self.domain.1, count)
    }

    fn tick_label(&self, value: f64, count: usize, _total: usize) -> Option<String> {
        // Enough decimals to tell neighbouring ticks apart
        let (lo, hi) = self.domain;
        let inc = tick_increment(lo.min(hi), lo.max(hi), count);
        let decimals = if inc < 0.0 {
            (-inc).log10().ceil().max(0.0) as usize
        } else {
            0
        };
        Some(format!("{:.*}", decimals, value))
    }
}

/// A base-10 logarithmic scale.
///
/// The domain must be strictly positive; values `<= 0` have no pixel position.
#[derive(Debug, Clone, PartialEq)]
pub struct LogScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self, ScaleError> {
        check_finite(domain.0, domain.1)?;
        if domain.0 <= 0.0 || domain.1 <= 0.0 {
            return Err(ScaleError::NonPositiveDomain {
                lower: domain.0,
                upper: domain.1,
            });
        }
        Ok(Self { domain, range })
    }
}

impl Scale for LogScale {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Log10
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn to_pixel(&self, value: f64) -> Option<f64> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let lo = self.domain.0.log10();
        let span = self.domain.1.log10() - lo;
        if span == 0.0 {
            return Some(interpolate(self.range, 0.5));
        }
        Some(interpolate(self.range, (value.log10() - lo) / span))
    }

    fn nice(&mut self, _count: usize) {
        let (lo, hi) = self.domain;
        let (lo, hi, reversed) = if hi < lo { (hi, lo, true) } else { (lo, hi, false) };
        let lo = pow10(lo.log10().floor());
        let hi = pow10(hi.log10().ceil());
        self.domain = if reversed { (hi, lo) } else { (lo, hi) };
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        let (u, v) = if self.domain.1 < self.domain.0 {
            (self.domain.1, self.domain.0)
        } else {
            self.domain
        };
        let (i, j) = (u.log10(), v.log10());
        let n = count as f64;

        if j - i < n {
            // Few decades: every k * 10^p inside the domain
            let mut ticks = Vec::new();
            let (first, last) = (i.floor() as i32, j.ceil() as i32);
            'decades: for p in first..=last {
                for k in 1..10 {
                    let t = if p < 0 {
                        k as f64 / pow10(-p as f64)
                    } else {
                        k as f64 * pow10(p as f64)
                    };
                    if t < u {
                        continue;
                    }
                    if t > v {
                        break 'decades;
                    }
                    ticks.push(t);
                }
            }
            if ticks.len() * 2 < count {
                return linear_ticks(u, v, count);
            }
            ticks
        } else {
            linear_ticks(i, j, count).into_iter().map(pow10).collect()
        }
    }

    fn tick_label(&self, value: f64, count: usize, total: usize) -> Option<String> {
        if value <= 0.0 || total == 0 {
            return None;
        }
        // Only label ticks whose leading digit fits the label budget
        let budget = (10.0 * count as f64 / total as f64).max(1.0);
        let mut mantissa = value / pow10((value.log10() + 0.5).floor());
        if mantissa * 10.0 < 9.5 {
            mantissa *= 10.0;
        }
        (mantissa <= budget + 1e-9).then(|| format!("{}", value))
    }
}

/// Scale of one axis, dispatching on [`ScaleKind`]
#[derive(Debug, Clone, PartialEq)]
pub enum AxisScale {
    Linear(LinearScale),
    Log10(LogScale),
}

impl AxisScale {
    pub fn new(kind: ScaleKind, domain: (f64, f64), range: (f64, f64)) -> Result<Self, ScaleError> {
        Ok(match kind {
            ScaleKind::Linear => AxisScale::Linear(LinearScale::new(domain, range)?),
            ScaleKind::Log10 => AxisScale::Log10(LogScale::new(domain, range)?),
        })
    }

    fn inner(&self) -> &dyn Scale {
        match self {
            AxisScale::Linear(s) => s,
            AxisScale::Log10(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Scale {
        match self {
            AxisScale::Linear(s) => s,
            AxisScale::Log10(s) => s,
        }
    }
}

impl Scale for AxisScale {
    fn kind(&self) -> ScaleKind {
        self.inner().kind()
    }

    fn domain(&self) -> (f64, f64) {
        self.inner().domain()
    }

    fn range(&self) -> (f64, f64) {
        self.inner().range()
    }

    fn to_pixel(&self, value: f64) -> Option<f64> {
        self.inner().to_pixel(value)
    }

    fn nice(&mut self, count: usize) {
        self.inner_mut().nice(count)
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        self.inner().ticks(count)
    }

    fn tick_label(&self, value: f64, count: usize, total: usize) -> Option<String> {
        self.inner().tick_label(value, count, total)
    }
}

/// Projects data points into a plot area
///
/// `origin` is the pixel offset of the axis area; the y scale's range is
/// expected to run top-down (`(height, 0)`).
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMapping {
    pub x: AxisScale,
    pub y: AxisScale,
    pub origin: (f64, f64),
}

impl PixelMapping {
    /// Pixel position of a point; `None` when either coordinate has no
    /// position (non-finite, or non-positive on a log axis).
    pub fn project(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let px = self.x.to_pixel(x)?;
        let py = self.y.to_pixel(y)?;
        Some((self.origin.0 + px, self.origin.1 + py))
    }
}

//! Axis limits and domain resolution against observed data.

use crate::types::Extent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configured `(lower, upper)` pair for an axis; `None` means "auto".
///
/// The wire form is a two-element array whose elements are a number or
/// `null`. Since TOML has no null, the string `"auto"` is accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "[Option<BoundRepr>; 2]",
    into = "[Option<f64>; 2]"
)]
pub struct AxisLimit {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BoundRepr {
    Value(f64),
    Keyword(String),
}

impl TryFrom<[Option<BoundRepr>; 2]> for AxisLimit {
    type Error = String;

    fn try_from([lower, upper]: [Option<BoundRepr>; 2]) -> Result<Self, Self::Error> {
        fn bound(repr: Option<BoundRepr>) -> Result<Option<f64>, String> {
            match repr {
                None => Ok(None),
                Some(BoundRepr::Value(v)) => Ok(Some(v)),
                Some(BoundRepr::Keyword(k)) if k.eq_ignore_ascii_case("auto") => Ok(None),
                Some(BoundRepr::Keyword(k)) => {
                    Err(format!("expected a number, null or \"auto\", got \"{k}\""))
                }
            }
        }
        Ok(AxisLimit {
            lower: bound(lower)?,
            upper: bound(upper)?,
        })
    }
}

impl From<AxisLimit> for [Option<f64>; 2] {
    fn from(limit: AxisLimit) -> Self {
        [limit.lower, limit.upper]
    }
}

impl AxisLimit {
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    /// Both bounds derived from data
    pub fn auto() -> Self {
        Self::default()
    }

    /// Both bounds fixed
    pub fn fixed(lower: f64, upper: f64) -> Self {
        Self::new(Some(lower), Some(upper))
    }

    /// Fixed lower bound, data-driven upper bound
    pub fn from_lower(lower: f64) -> Self {
        Self::new(Some(lower), None)
    }

    /// Whether at least one bound follows the data
    pub fn is_dynamic(&self) -> bool {
        self.lower.is_none() || self.upper.is_none()
    }

    /// Fixed bounds present in this limit
    pub fn fixed_bounds(&self) -> impl Iterator<Item = f64> {
        self.lower.into_iter().chain(self.upper)
    }
}

impl fmt::Display for AxisLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |b: Option<f64>| b.map_or_else(|| "auto".to_string(), |v| v.to_string());
        write!(f, "[{}, {}]", show(self.lower), show(self.upper))
    }
}

/// Domain after substituting auto bounds with observed data
///
/// A bound stays `None` when it is auto and no finite data exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedDomain {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl ResolvedDomain {
    /// Ordered `(min, max)` once at least one bound is known
    ///
    /// With a single known bound the domain collapses onto it; the nice
    /// expansion step pads it into a drawable range on the auto side.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match (self.lower, self.upper) {
            (Some(lo), Some(hi)) if lo <= hi => Some((lo, hi)),
            (Some(lo), Some(hi)) => Some((hi, lo)),
            (Some(v), None) | (None, Some(v)) => Some((v, v)),
            (None, None) => None,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.bounds().is_some()
    }
}

/// Which end of a zero-width domain may move when it is padded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadSide {
    #[default]
    Both,
    /// Lower bound is fixed
    Upper,
    /// Upper bound is fixed
    Lower,
}

impl PadSide {
    /// Only auto bounds move; a fully fixed limit is never zero-width.
    pub fn for_limit(limit: &AxisLimit) -> Self {
        match (limit.lower, limit.upper) {
            (Some(_), None) => PadSide::Upper,
            (None, Some(_)) => PadSide::Lower,
            _ => PadSide::Both,
        }
    }
}

/// Resolve a configured limit against the observed extent.
///
/// Fixed bounds always win, even when data lies outside them. Auto bounds
/// take the observed min/max; an absent extent (no finite data) leaves them
/// unresolved instead of leaking infinities into the domain.
pub fn resolve_domain(limit: &AxisLimit, observed: Option<Extent>) -> ResolvedDomain {
    ResolvedDomain {
        lower: limit.lower.or(observed.map(|e| e.min)),
        upper: limit.upper.or(observed.map(|e| e.max)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_wire_format() {
        let limit: AxisLimit = serde_json::from_str("[0, null]").unwrap();
        assert_eq!(limit, AxisLimit::from_lower(0.0));
        assert!(limit.is_dynamic());

        let limit: AxisLimit = serde_json::from_str("[0.5, 2]").unwrap();
        assert_eq!(limit, AxisLimit::fixed(0.5, 2.0));
        assert!(!limit.is_dynamic());

        assert_eq!(serde_json::to_string(&AxisLimit::from_lower(0.0)).unwrap(), "[0.0,null]");
    }

    #[test]
    fn test_limit_accepts_auto_keyword() {
        let limit: AxisLimit = serde_json::from_str(r#"["auto", 3]"#).unwrap();
        assert_eq!(limit, AxisLimit::new(None, Some(3.0)));
        assert!(serde_json::from_str::<AxisLimit>(r#"["max", 3]"#).is_err());
        assert!(serde_json::from_str::<AxisLimit>("[1]").is_err());
    }

    #[test]
    fn test_zero_is_not_auto() {
        let limit: AxisLimit = serde_json::from_str("[0, 0]").unwrap();
        assert_eq!(limit.lower, Some(0.0));
        assert_eq!(limit.upper, Some(0.0));
    }

    #[test]
    fn test_resolve_without_data() {
        let resolved = resolve_domain(&AxisLimit::auto(), None);
        assert_eq!(resolved, ResolvedDomain::default());
        assert!(!resolved.is_drawable());

        let resolved = resolve_domain(&AxisLimit::from_lower(0.0), None);
        assert_eq!(resolved.bounds(), Some((0.0, 0.0)));
    }

    #[test]
    fn test_resolve_fixed_bound_wins() {
        let observed = Extent::of([-5.0, 50.0]);
        let resolved = resolve_domain(&AxisLimit::new(Some(0.0), None), observed);
        assert_eq!(resolved.bounds(), Some((0.0, 50.0)));
    }

    #[test]
    fn test_pad_side_follows_auto_bounds() {
        assert_eq!(PadSide::for_limit(&AxisLimit::auto()), PadSide::Both);
        assert_eq!(PadSide::for_limit(&AxisLimit::from_lower(0.0)), PadSide::Upper);
        assert_eq!(PadSide::for_limit(&AxisLimit::new(None, Some(1.0))), PadSide::Lower);
        assert_eq!(PadSide::for_limit(&AxisLimit::fixed(0.0, 1.0)), PadSide::Both);
    }

    #[test]
    fn test_display() {
        assert_eq!(AxisLimit::from_lower(0.0).to_string(), "[0, auto]");
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_fixed_limits_ignore_data(
            lo in -1.0e6f64..1.0e6,
            hi in -1.0e6f64..1.0e6,
            values in proptest::collection::vec(-1.0e9f64..1.0e9, 0..20)
        ) {
            let limit = AxisLimit::fixed(lo, hi);
            let resolved = resolve_domain(&limit, Extent::of(values));
            prop_assert_eq!(resolved.lower, Some(lo));
            prop_assert_eq!(resolved.upper, Some(hi));
        }

        #[test]
        fn test_auto_limits_track_extent(
            values in proptest::collection::vec(-1.0e9f64..1.0e9, 1..50)
        ) {
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let resolved = resolve_domain(&AxisLimit::auto(), Extent::of(values));
            prop_assert_eq!(resolved.lower, Some(min));
            prop_assert_eq!(resolved.upper, Some(max));
        }
    }
}

//! Human-friendly tick generation for linear domains.
//!
//! Steps are powers of ten times 1, 2 or 5, picked so that roughly `count`
//! intervals span the domain. Outputs are a pure function of
//! `(start, stop, count)`, which keeps axes from jittering between redraws.

/// Step thresholds for switching to a 10x, 5x or 2x multiplier.
const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Rounds half-way cases towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Integer tick indices and the increment that maps them back to values.
///
/// A negative `inc` means values are `i / -inc`, which avoids accumulating
/// binary rounding error on fractional steps such as 0.1.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TickSpec {
    i1: f64,
    i2: f64,
    inc: f64,
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<TickSpec> {
    if !(count > 0.0) {
        return None;
    }

    let step = (stop - start) / count;
    if !step.is_finite() || step <= 0.0 {
        return None;
    }

    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let spec = if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = round_half_up(start * inc);
        let mut i2 = round_half_up(stop * inc);
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        TickSpec { i1, i2, inc: -inc }
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = round_half_up(start / inc);
        let mut i2 = round_half_up(stop / inc);
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        TickSpec { i1, i2, inc }
    };

    if spec.i2 < spec.i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }

    if !spec.inc.is_finite() || spec.inc == 0.0 {
        return None;
    }

    Some(spec)
}

/// Signed tick increment for `count` intervals over `[start, stop]`.
///
/// Positive results are the step itself; negative results `-k` mean a step
/// of `1 / k`. Returns 0.0 when no increment exists (empty or degenerate
/// domain, zero count).
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64)
        .map(|spec| spec.inc)
        .unwrap_or(0.0)
}

/// Evenly spaced round values within `[start, stop]`, ascending.
///
/// A degenerate domain yields the single value; reversed inputs are
/// treated as the same interval.
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let Some(spec) = tick_spec(lo, hi, count as f64) else {
        return Vec::new();
    };
    if spec.i2 < spec.i1 {
        return Vec::new();
    }

    let n = (spec.i2 - spec.i1) as usize + 1;
    (0..n)
        .map(|i| {
            let index = spec.i1 + i as f64;
            if spec.inc < 0.0 {
                index / -spec.inc
            } else {
                index * spec.inc
            }
        })
        .collect()
}

/// Widen `[start, stop]` outward so both ends land on a tick step.
///
/// Iterates until the step stabilises (at most ten rounds). The input order
/// is preserved in the output.
pub fn nice_linear(start: f64, stop: f64, count: usize) -> (f64, f64) {
    let reversed = stop < start;
    let (mut lo, mut hi) = if reversed { (stop, start) } else { (start, stop) };

    let mut previous_step = None;
    for _ in 0..10 {
        let step = tick_increment(lo, hi, count);
        if previous_step == Some(step) {
            break;
        }
        if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else if step < 0.0 {
            lo = (lo * step).ceil() / step;
            hi = (hi * step).floor() / step;
        } else {
            break;
        }
        previous_step = Some(step);
    }

    // `ceil(-0.0 * k) / -k` style arithmetic can produce negative zero
    let lo = if lo == 0.0 { 0.0 } else { lo };
    let hi = if hi == 0.0 { 0.0 } else { hi };

    if reversed {
        (hi, lo)
    } else {
        (lo, hi)
    }
}

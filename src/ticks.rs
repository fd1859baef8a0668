//! "Nice number" tick generation.
//!
//! A span `[lo, hi]` is turned into a step of the form `{1, 2, 5} * 10^k` and
//! the multiples of that step falling inside the span. Tick sets are rebuilt
//! on every render and never cached.

use crate::errors::TickError;

/// Slack used when snapping mantissas, so values that are already nice stay put
const SNAP_SLACK: f64 = 1e-9;

/// Upper bound on step re-adjustments in [`make_ticks`]
const MAX_STEP_ADJUST: usize = 64;

/// A single tick: where it sits and what it says
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub loc: f64,
    pub label: String,
}

/// Ordered tick locations with their formatted labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSet {
    step: f64,
    ticks: Vec<Tick>,
}

impl TickSet {
    /// Spacing between consecutive ticks
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tick> {
        self.ticks.iter()
    }

    pub fn locs(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks.iter().map(|t| t.loc)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.ticks.iter().map(|t| t.label.as_str())
    }
}

impl<'a> IntoIterator for &'a TickSet {
    type Item = &'a Tick;
    type IntoIter = std::slice::Iter<'a, Tick>;

    fn into_iter(self) -> Self::IntoIter {
        self.ticks.iter()
    }
}

/// Round `range` to a "nice" value: 1, 2, 5 or 10 times a power of ten.
///
/// With `round` the mantissa snaps to the nearest nice value (thresholds 1.5,
/// 3, 7); without it the mantissa snaps upward (thresholds 1, 2, 5).
/// Non-positive or non-finite input is treated as 1.
pub fn nice_num(range: f64, round: bool) -> f64 {
    let range = if range > 0.0 && range.is_finite() { range } else { 1.0 };
    let exp = range.log10().floor();
    let f = range / 10f64.powf(exp);

    let nf = if round {
        if f < 1.5 {
            1.0
        } else if f < 3.0 {
            2.0
        } else if f < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if f <= 1.0 + SNAP_SLACK {
        1.0
    } else if f <= 2.0 + SNAP_SLACK {
        2.0
    } else if f <= 5.0 + SNAP_SLACK {
        5.0
    } else {
        10.0
    };

    // 10 * 10^k is written as 10^(k+1) so a nice value maps to itself
    if nf == 10.0 {
        10f64.powf(exp + 1.0)
    } else {
        nf * 10f64.powf(exp)
    }
}

/// Generate between 1 and `target + 2` ticks inside `[lo, hi]`.
///
/// `hi` must be strictly greater than `lo` for a meaningful result; an empty
/// span still yields a single tick at `lo`. `target` below 2 is rejected.
pub fn make_ticks(lo: f64, hi: f64, target: usize) -> Result<TickSet, TickError> {
    if target < 2 {
        return Err(TickError::TooFewTicks { target });
    }
    if !lo.is_finite() || !hi.is_finite() {
        return Err(TickError::NonFiniteSpan { lo, hi });
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if !(hi - lo).is_finite() {
        return Err(TickError::NonFiniteSpan { lo, hi });
    }

    let max_slots = 4 * (target + 2);
    let raw_step = (hi - lo) / (target - 1) as f64;
    let range = nice_num(hi - lo, false);
    let mut step = if range.is_finite() {
        nice_num(range / (target - 1) as f64, true)
    } else {
        nice_num(raw_step, true)
    };
    if !step.is_finite() {
        // Rounding up overflowed near f64::MAX; round down instead
        step = 10f64.powf(raw_step.log10().floor());
    }
    let mut locs = tick_locations(lo, hi, step, max_slots);

    // A coarse mantissa can land far from the target count; walk the step
    // along the 1-2-5 ladder until the count is in range.
    for _ in 0..MAX_STEP_ADJUST {
        let wanted = if locs.len() > target + 2 {
            step * 2.0
        } else if locs.is_empty() {
            step / 2.0
        } else {
            break;
        };
        let next = nice_num(wanted, true);
        if !wanted.is_finite() || !next.is_finite() {
            break;
        }
        step = next;
        locs = tick_locations(lo, hi, step, max_slots);
    }
    if locs.is_empty() {
        locs.push(lo);
    }

    let decimals = if step >= 1.0 { 0 } else { 1 };
    let ticks = locs
        .into_iter()
        .map(|loc| Tick {
            loc,
            label: format!("{:.*}", decimals, loc),
        })
        .collect();

    Ok(TickSet { step, ticks })
}

/// Multiples of `step` between `lo` and `hi`, clipped to the span.
///
/// Stops after `max_slots` candidates; an over-full result makes the caller
/// widen the step. Returns nothing when the multiples are not representable.
fn tick_locations(lo: f64, hi: f64, step: f64, max_slots: usize) -> Vec<f64> {
    let eps = step * SNAP_SLACK;
    let graph_lo = (lo / step).floor() * step;
    let graph_hi = (hi / step).ceil() * step;
    if !graph_lo.is_finite() || !graph_hi.is_finite() {
        return Vec::new();
    }

    let mut locs = Vec::new();
    for i in 0..max_slots {
        let mut v = graph_lo + i as f64 * step;
        if v > graph_hi + 0.5 * step {
            break;
        }
        if v < lo - eps || v > hi + eps {
            continue;
        }
        if v.abs() < eps {
            v = 0.0;
        }
        locs.push(v.clamp(lo, hi));
    }
    locs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(ts: &TickSet) -> String {
        ts.labels().collect::<Vec<_>>().join(" ")
    }

    // ==================== nice_num tests ====================

    #[test]
    fn nice_num_rounds_to_nearest() {
        assert_eq!(nice_num(1.2, true), 1.0);
        assert_eq!(nice_num(2.2, true), 2.0);
        assert_eq!(nice_num(3.2, true), 5.0);
        assert_eq!(nice_num(8.0, true), 10.0);
        assert_eq!(nice_num(45.0, true), 50.0);
    }

    #[test]
    fn nice_num_ceils_without_round() {
        assert_eq!(nice_num(1.0, false), 1.0);
        assert_eq!(nice_num(1.2, false), 2.0);
        assert_eq!(nice_num(2.0, false), 2.0);
        assert_eq!(nice_num(2.1, false), 5.0);
        assert_eq!(nice_num(5.5, false), 10.0);
        assert_eq!(nice_num(10.0, false), 10.0);
    }

    #[test]
    fn nice_num_non_positive_is_one() {
        assert_eq!(nice_num(0.0, true), 1.0);
        assert_eq!(nice_num(-3.0, false), 1.0);
        assert_eq!(nice_num(f64::NAN, false), 1.0);
    }

    #[test]
    fn nice_num_is_idempotent() {
        let samples = [
            1e-7, 3.3e-5, 0.0042, 0.07, 0.15, 0.999, 1.0, 1.49, 2.5, 3.0, 6.99, 7.0, 9.9, 12.0,
            55.0, 101.0, 7777.0, 3.2e9,
        ];
        for &x in &samples {
            for round in [true, false] {
                let once = nice_num(x, round);
                assert_eq!(nice_num(once, round), once, "x={x} round={round}");
            }
        }
    }

    // ==================== make_ticks tests ====================

    #[test]
    fn ticks_zero_to_ten() {
        let ts = make_ticks(0.0, 10.0, 6).unwrap();
        assert_eq!(ts.step(), 2.0);
        assert_eq!(ts.locs().collect::<Vec<_>>(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        insta::assert_snapshot!(labels(&ts), @"0 2 4 6 8 10");
    }

    #[test]
    fn ticks_fractional_step_use_one_decimal() {
        let ts = make_ticks(-1.0, 1.0, 6).unwrap();
        assert!((ts.step() - 0.5).abs() < 1e-12);
        insta::assert_snapshot!(labels(&ts), @"-1.0 -0.5 0.0 0.5 1.0");
    }

    #[test]
    fn ticks_are_clipped_to_span() {
        let ts = make_ticks(0.3, 9.7, 6).unwrap();
        assert!(ts.locs().all(|v| (0.3..=9.7).contains(&v)));
        insta::assert_snapshot!(labels(&ts), @"2 4 6 8");
    }

    #[test]
    fn ticks_rejects_small_target() {
        assert_eq!(make_ticks(0.0, 1.0, 1), Err(TickError::TooFewTicks { target: 1 }));
        assert_eq!(make_ticks(0.0, 1.0, 0), Err(TickError::TooFewTicks { target: 0 }));
    }

    #[test]
    fn ticks_rejects_non_finite_span() {
        assert!(matches!(
            make_ticks(0.0, f64::INFINITY, 6),
            Err(TickError::NonFiniteSpan { .. })
        ));
    }

    #[test]
    fn ticks_rejects_span_that_overflows() {
        assert_eq!(
            make_ticks(-1e308, 1e308, 6),
            Err(TickError::NonFiniteSpan { lo: -1e308, hi: 1e308 })
        );
        assert!(matches!(
            make_ticks(f64::MAX, -f64::MAX, 6),
            Err(TickError::NonFiniteSpan { .. })
        ));
    }

    #[test]
    fn ticks_near_float_limit_still_finish() {
        let ts = make_ticks(1e308, 1e308, 6).unwrap();
        assert_eq!(ts.locs().collect::<Vec<_>>(), vec![1e308]);

        let ts = make_ticks(0.0, 1.5e308, 6).unwrap();
        assert!((1..=8).contains(&ts.len()));
        assert!(ts.locs().all(|v| v.is_finite() && (0.0..=1.5e308).contains(&v)));
    }

    #[test]
    fn ticks_count_bound_holds_across_spans() {
        // Deterministic pseudo-random spans covering many magnitudes
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 11) as f64 / (1u64 << 53) as f64
        };

        for _ in 0..2000 {
            let magnitude = 10f64.powf(next() * 12.0 - 6.0);
            let lo = (next() - 0.5) * magnitude * 4.0;
            let hi = lo + magnitude * (0.01 + next());
            for target in 2..=12 {
                let ts = make_ticks(lo, hi, target).unwrap();
                assert!(
                    (1..=target + 2).contains(&ts.len()),
                    "lo={lo} hi={hi} target={target} got {}",
                    ts.len()
                );
                let locs: Vec<f64> = ts.locs().collect();
                assert!(locs.iter().all(|&v| v >= lo && v <= hi));
                for pair in locs.windows(2) {
                    assert!(pair[1] > pair[0]);
                    let gap = pair[1] - pair[0];
                    assert!((gap - ts.step()).abs() <= ts.step() * 1e-6);
                }
                assert_eq!(nice_num(ts.step(), true), ts.step());
            }
        }
    }

    #[test]
    fn ticks_large_target_walks_step_up() {
        // 1/7 rounds down to a step of 0.1, which would give 11 ticks
        let ts = make_ticks(0.0, 1.0, 8).unwrap();
        assert!(ts.len() <= 10);
        assert!((ts.step() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn ticks_narrow_span_walks_step_down() {
        // The first step (0.5) has no multiple inside [0.01, 0.22]
        let ts = make_ticks(0.01, 0.22, 2).unwrap();
        assert!(!ts.is_empty());
        assert!(ts.locs().all(|v| (0.01..=0.22).contains(&v)));
    }

    #[test]
    fn ticks_never_print_negative_zero() {
        let ts = make_ticks(-0.3, 0.3, 6).unwrap();
        assert!(ts.labels().all(|l| l != "-0.0" && l != "-0"));
    }
}

//! Crossover detection between a fast and a slow trend line.
//!
//! Fast crossing above slow is `CrossFromBelow` (golden cross); fast crossing below slow
//! is `CrossFromAbove` (death cross). Touching counts as the starting side, so a line
//! that meets the other and then breaks through still fires exactly once.

use serde::{Deserialize, Serialize};

use crate::domain::OrderSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossoverState {
    #[default]
    NoCross,
    /// Fast moved from at-or-below slow to strictly above it.
    CrossFromBelow,
    /// Fast moved from at-or-above slow to strictly below it.
    CrossFromAbove,
}

impl CrossoverState {
    /// Entry direction implied by the crossover, if any.
    pub fn entry_side(&self) -> Option<OrderSide> {
        match self {
            CrossoverState::NoCross => None,
            CrossoverState::CrossFromBelow => Some(OrderSide::Buy),
            CrossoverState::CrossFromAbove => Some(OrderSide::Sell),
        }
    }

    pub fn is_cross(&self) -> bool {
        !matches!(self, CrossoverState::NoCross)
    }
}

impl std::fmt::Display for CrossoverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrossoverState::NoCross => write!(f, "no_cross"),
            CrossoverState::CrossFromBelow => write!(f, "cross_from_below"),
            CrossoverState::CrossFromAbove => write!(f, "cross_from_above"),
        }
    }
}

/// Classify the transition between two consecutive (fast, slow) pairs.
///
/// Any non-finite input yields `NoCross`.
pub fn classify(fast_prev: f64, slow_prev: f64, fast_cur: f64, slow_cur: f64) -> CrossoverState {
    if !(fast_prev.is_finite()
        && slow_prev.is_finite()
        && fast_cur.is_finite()
        && slow_cur.is_finite())
    {
        return CrossoverState::NoCross;
    }

    if fast_prev <= slow_prev && fast_cur > slow_cur {
        CrossoverState::CrossFromBelow
    } else if fast_prev >= slow_prev && fast_cur < slow_cur {
        CrossoverState::CrossFromAbove
    } else {
        CrossoverState::NoCross
    }
}

/// Classify the transition into index `i` of two aligned series.
///
/// Index 0 has no predecessor, so it never crosses. Out-of-range indices and series of
/// different lengths also yield `NoCross`.
pub fn classify_at(fast: &[f64], slow: &[f64], i: usize) -> CrossoverState {
    if i == 0 || fast.len() != slow.len() || i >= fast.len() {
        return CrossoverState::NoCross;
    }
    classify(fast[i - 1], slow[i - 1], fast[i], slow[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_cross() {
        assert_eq!(classify(9.0, 10.0, 11.0, 10.0), CrossoverState::CrossFromBelow);
    }

    #[test]
    fn death_cross() {
        assert_eq!(classify(11.0, 10.0, 9.0, 10.0), CrossoverState::CrossFromAbove);
    }

    #[test]
    fn touch_then_break_counts_from_touch() {
        // prev equal, cur above
        assert_eq!(classify(10.0, 10.0, 10.5, 10.0), CrossoverState::CrossFromBelow);
        // prev equal, cur below
        assert_eq!(classify(10.0, 10.0, 9.5, 10.0), CrossoverState::CrossFromAbove);
    }

    #[test]
    fn touching_without_breaking_is_no_cross() {
        assert_eq!(classify(9.0, 10.0, 10.0, 10.0), CrossoverState::NoCross);
        assert_eq!(classify(10.0, 10.0, 10.0, 10.0), CrossoverState::NoCross);
    }

    #[test]
    fn staying_on_one_side_is_no_cross() {
        assert_eq!(classify(11.0, 10.0, 12.0, 10.0), CrossoverState::NoCross);
        assert_eq!(classify(9.0, 10.0, 8.0, 10.0), CrossoverState::NoCross);
    }

    #[test]
    fn non_finite_is_no_cross() {
        assert_eq!(classify(f64::NAN, 10.0, 11.0, 10.0), CrossoverState::NoCross);
        assert_eq!(
            classify(9.0, 10.0, f64::INFINITY, 10.0),
            CrossoverState::NoCross
        );
    }

    #[test]
    fn classify_at_guards() {
        let fast = [9.0, 11.0];
        let slow = [10.0, 10.0];
        assert_eq!(classify_at(&fast, &slow, 0), CrossoverState::NoCross);
        assert_eq!(classify_at(&fast, &slow, 1), CrossoverState::CrossFromBelow);
        assert_eq!(classify_at(&fast, &slow, 2), CrossoverState::NoCross);
        assert_eq!(classify_at(&fast, &slow[..1], 1), CrossoverState::NoCross);
    }

    #[test]
    fn entry_side_mapping() {
        assert_eq!(CrossoverState::NoCross.entry_side(), None);
        assert_eq!(
            CrossoverState::CrossFromBelow.entry_side(),
            Some(OrderSide::Buy)
        );
        assert_eq!(
            CrossoverState::CrossFromAbove.entry_side(),
            Some(OrderSide::Sell)
        );
    }
}

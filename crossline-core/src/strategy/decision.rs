//! Crossover-to-action table.
//!
//! | position | crossover        | action                            |
//! |----------|------------------|-----------------------------------|
//! | Short    | CrossFromBelow   | cancel all, flatten, Buy entry    |
//! | Flat/Long| CrossFromBelow   | Buy entry                         |
//! | Long     | CrossFromAbove   | cancel all, flatten, Sell entry   |
//! | Flat/Short| CrossFromAbove  | Sell entry                        |
//! | any      | NoCross          | none                              |
//!
//! Entries then pass the same-direction and max-position gates.

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::crossover::CrossoverState;
use crate::domain::{OrderSide, PositionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuppressReason {
    /// Entry in the direction already held, with stacking disabled.
    SameDirection,
    /// Entry would take the absolute position past `max_position`.
    MaxPosition,
}

impl std::fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuppressReason::SameDirection => write!(f, "same_direction"),
            SuppressReason::MaxPosition => write!(f, "max_position"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Hold,
    Enter {
        side: OrderSide,
        /// Cancel all orders and flatten before entering.
        flatten_first: bool,
    },
    Suppressed {
        side: OrderSide,
        reason: SuppressReason,
    },
}

impl Decision {
    pub fn is_entry(&self) -> bool {
        matches!(self, Decision::Enter { .. })
    }
}

/// Map a crossover and the current position to at most one action.
pub fn decide(
    crossover: CrossoverState,
    position: &PositionSnapshot,
    config: &StrategyConfig,
) -> Decision {
    let Some(side) = crossover.entry_side() else {
        return Decision::Hold;
    };

    let flatten_first = position.quantity.signum() == side.opposite().sign();
    let base = if flatten_first { 0 } else { position.quantity };

    if base.signum() == side.sign() && !config.allow_multiple_entries_same_direction {
        return Decision::Suppressed {
            side,
            reason: SuppressReason::SameDirection,
        };
    }

    let resulting = base + side.sign() * i64::from(config.order_quantity);
    if resulting.unsigned_abs() > u64::from(config.max_position) {
        return Decision::Suppressed {
            side,
            reason: SuppressReason::MaxPosition,
        };
    }

    Decision::Enter {
        side,
        flatten_first,
    }
}

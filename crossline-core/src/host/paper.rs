//! Position-only paper host.
//!
//! Applies flatten and entry requests to its own net position at once and enforces the
//! same entry limits a live host would. It does not price fills.

use tracing::debug;

use crate::config::StrategyConfig;
use crate::domain::PositionSnapshot;
use crate::orders::OrderIntent;

use super::{ExecutionHost, SubmitOutcome};

#[derive(Debug, Clone)]
pub struct PaperHost {
    quantity: i64,
    max_position: u32,
    allow_multiple_entries_same_direction: bool,
    working_orders: usize,
    accepted: usize,
    rejected: usize,
    flattens: usize,
}

impl PaperHost {
    pub fn new(max_position: u32, allow_multiple_entries_same_direction: bool) -> Self {
        Self {
            quantity: 0,
            max_position,
            allow_multiple_entries_same_direction,
            working_orders: 0,
            accepted: 0,
            rejected: 0,
            flattens: 0,
        }
    }

    /// Limits taken from the strategy's gate settings.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(
            config.max_position,
            config.allow_multiple_entries_same_direction,
        )
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Bracket legs still working (two per accepted entry until cancelled).
    pub fn working_orders(&self) -> usize {
        self.working_orders
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn flattens(&self) -> usize {
        self.flattens
    }

    fn check(&self, intent: &OrderIntent) -> Result<(), String> {
        let same_direction = self.quantity.signum() == intent.side.sign();
        if same_direction && !self.allow_multiple_entries_same_direction {
            return Err(format!(
                "already {} {} with same-direction entries disabled",
                if self.quantity > 0 { "long" } else { "short" },
                self.quantity.abs()
            ));
        }
        let resulting = self.quantity + intent.signed_quantity();
        if resulting.unsigned_abs() > u64::from(self.max_position) {
            return Err(format!(
                "entry would leave position {resulting}, max is {}",
                self.max_position
            ));
        }
        Ok(())
    }
}

impl Default for PaperHost {
    fn default() -> Self {
        Self::new(1, false)
    }
}

impl ExecutionHost for PaperHost {
    fn position(&self) -> PositionSnapshot {
        PositionSnapshot::new(self.quantity)
    }

    fn cancel_all_orders(&mut self) {
        self.working_orders = 0;
    }

    fn flatten_position(&mut self) {
        if self.quantity != 0 {
            debug!(closed = self.quantity, "paper flatten");
            self.flattens += 1;
        }
        self.quantity = 0;
    }

    fn submit_entry(&mut self, intent: &OrderIntent) -> SubmitOutcome {
        match self.check(intent) {
            Ok(()) => {
                self.quantity += intent.signed_quantity();
                self.working_orders += 2;
                self.accepted += 1;
                SubmitOutcome::Accepted
            }
            Err(reason) => {
                self.rejected += 1;
                SubmitOutcome::Rejected { reason }
            }
        }
    }
}

//! Execution host seam.
//!
//! The decision core never talks to a broker. It reads the net position and issues
//! fire-and-forget requests through `ExecutionHost`; whatever routes them (a trading
//! platform adapter, a paper account, a test double) implements the trait.

pub mod paper;
pub mod recording;

pub use paper::PaperHost;
pub use recording::{HostCall, RecordingHost};

use serde::{Deserialize, Serialize};

use crate::domain::PositionSnapshot;
use crate::orders::OrderIntent;

/// Result of handing an entry to the host.
///
/// A rejection is a normal outcome, not an error: it is logged and not retried. The
/// next bar close re-derives the decision from the position the host reports then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    Accepted,
    Rejected { reason: String },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}

/// Requests the core issues to whatever executes orders.
///
/// Position changes caused by these requests may only become visible on a later bar.
pub trait ExecutionHost {
    /// Current net position. Queried once per evaluation.
    fn position(&self) -> PositionSnapshot;

    /// Cancel every working order of this strategy, brackets included.
    fn cancel_all_orders(&mut self);

    /// Close the open position at market.
    fn flatten_position(&mut self);

    /// Submit a market entry with its attached bracket.
    fn submit_entry(&mut self, intent: &OrderIntent) -> SubmitOutcome;
}

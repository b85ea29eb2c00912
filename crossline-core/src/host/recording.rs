//! Test double that records every request verbatim.

use std::collections::VecDeque;

use crate::domain::PositionSnapshot;
use crate::orders::OrderIntent;

use super::{ExecutionHost, SubmitOutcome};

/// One request received by a `RecordingHost`.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CancelAllOrders,
    FlattenPosition,
    SubmitEntry(OrderIntent),
}

/// Records the exact call sequence against a scripted position.
///
/// The position never changes on its own; tests move it with `set_position` to model
/// the host settling orders between bars.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    position: PositionSnapshot,
    calls: Vec<HostCall>,
    queued_rejections: VecDeque<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(quantity: i64) -> Self {
        Self {
            position: PositionSnapshot::new(quantity),
            ..Self::default()
        }
    }

    pub fn set_position(&mut self, quantity: i64) {
        self.position = PositionSnapshot::new(quantity);
    }

    /// Reject the next entry with `reason`. Queued rejections are consumed in order.
    pub fn reject_next(&mut self, reason: impl Into<String>) {
        self.queued_rejections.push_back(reason.into());
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain recorded calls, keeping position and queued rejections.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Submitted intents, in order.
    pub fn entries(&self) -> Vec<&OrderIntent> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::SubmitEntry(intent) => Some(intent),
                _ => None,
            })
            .collect()
    }
}

impl ExecutionHost for RecordingHost {
    fn position(&self) -> PositionSnapshot {
        self.position
    }

    fn cancel_all_orders(&mut self) {
        self.calls.push(HostCall::CancelAllOrders);
    }

    fn flatten_position(&mut self) {
        self.calls.push(HostCall::FlattenPosition);
    }

    fn submit_entry(&mut self, intent: &OrderIntent) -> SubmitOutcome {
        self.calls.push(HostCall::SubmitEntry(intent.clone()));
        match self.queued_rejections.pop_front() {
            Some(reason) => SubmitOutcome::Rejected { reason },
            None => SubmitOutcome::Accepted,
        }
    }
}

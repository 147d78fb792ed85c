//! Confirmation rules for abandoning a workflow.

use crate::draft::BookingDraft;
use crate::state::WorkflowState;

/// What a close request should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    /// Closing is not possible right now.
    Blocked,
    /// Ask the user before discarding their input.
    Confirm,
    /// Close straight away.
    Close,
}

/// Whether closing needs an explicit confirmation.
#[must_use]
pub fn should_confirm(state: &WorkflowState, draft: &BookingDraft) -> bool {
    matches!(state, WorkflowState::Booking) && draft.is_dirty()
}

/// Decide how a close request is handled.
#[must_use]
pub fn exit_decision(state: &WorkflowState, draft: &BookingDraft) -> ExitDecision {
    if matches!(state, WorkflowState::Processing) {
        ExitDecision::Blocked
    } else if should_confirm(state, draft) {
        ExitDecision::Confirm
    } else {
        ExitDecision::Close
    }
}

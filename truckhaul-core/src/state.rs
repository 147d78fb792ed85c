//! Workflow steps and the single function that moves between them.

use std::fmt;

use crate::error::WorkflowError;
use crate::payment::PaymentFailure;

/// Which step of the booking workflow is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    /// Not open.
    Idle,
    /// Collecting the trip and showing the live fare.
    Booking,
    /// Collecting contact details for an existing booking.
    Payment,
    /// A payment session request is in flight.
    Processing,
    /// Handed off to the gateway.
    Success,
    /// Payment initiation failed; retry or cancel.
    Error(PaymentFailure),
}

impl WorkflowState {
    /// Short name for logs and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Booking => "booking",
            WorkflowState::Payment => "payment",
            WorkflowState::Processing => "processing",
            WorkflowState::Success => "success",
            WorkflowState::Error(_) => "error",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.name())
    }
}

/// Inputs that move the workflow between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// The host opened the workflow.
    Open,
    /// The trip is booked (or already was) and contact details are next.
    ProceedToPayment,
    /// Return to the trip step.
    Back,
    /// Contact details validated; open a gateway session.
    SubmitPayment,
    /// The gateway session is ready for handoff.
    GatewayReady,
    /// The gateway session could not be opened.
    GatewayFailed(PaymentFailure),
    /// Retry payment from the error step.
    Retry,
    /// Abandon the workflow.
    Close,
}

impl WorkflowEvent {
    fn name(self) -> &'static str {
        match self {
            WorkflowEvent::Open => "open",
            WorkflowEvent::ProceedToPayment => "continue to payment",
            WorkflowEvent::Back => "back",
            WorkflowEvent::SubmitPayment => "submit payment",
            WorkflowEvent::GatewayReady => "gateway handoff",
            WorkflowEvent::GatewayFailed(_) => "gateway failure",
            WorkflowEvent::Retry => "retry",
            WorkflowEvent::Close => "close",
        }
    }
}

/// Compute the step that follows `state` on `event`.
///
/// While [`WorkflowState::Processing`] only the gateway outcome is accepted; everything
/// else is [`WorkflowError::Busy`]. An expired booking sends the workflow back to the trip
/// step so the booking can be created again.
///
/// # Errors
///
/// Returns [`WorkflowError::Busy`] during processing and
/// [`WorkflowError::InvalidTransition`] for any other pair with no edge.
pub fn transition(
    state: &WorkflowState,
    event: WorkflowEvent,
) -> Result<WorkflowState, WorkflowError> {
    use WorkflowEvent as Ev;
    use WorkflowState as St;

    match (state, event) {
        (St::Processing, Ev::GatewayReady) => Ok(St::Success),
        (St::Processing, Ev::GatewayFailed(PaymentFailure::BookingNotFound)) => Ok(St::Booking),
        (St::Processing, Ev::GatewayFailed(failure)) => Ok(St::Error(failure)),
        (St::Processing, _) => Err(WorkflowError::Busy),

        (St::Idle, Ev::Open) => Ok(St::Booking),
        (St::Booking, Ev::ProceedToPayment) => Ok(St::Payment),
        (St::Payment | St::Error(_), Ev::Back) => Ok(St::Booking),
        (St::Payment, Ev::SubmitPayment) => Ok(St::Processing),
        (St::Error(_), Ev::Retry) => Ok(St::Payment),
        (_, Ev::Close) => Ok(St::Idle),

        (current, attempted) => Err(WorkflowError::InvalidTransition {
            state: current.name(),
            action: attempted.name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_success() {
        let mut state = WorkflowState::Idle;
        for event in [
            WorkflowEvent::Open,
            WorkflowEvent::ProceedToPayment,
            WorkflowEvent::SubmitPayment,
            WorkflowEvent::GatewayReady,
        ] {
            state = transition(&state, event).expect("edge exists");
        }
        assert_eq!(state, WorkflowState::Success);
    }

    #[test]
    fn processing_rejects_everything_but_the_outcome() {
        for event in [
            WorkflowEvent::Close,
            WorkflowEvent::Back,
            WorkflowEvent::Retry,
            WorkflowEvent::SubmitPayment,
        ] {
            assert!(matches!(
                transition(&WorkflowState::Processing, event),
                Err(WorkflowError::Busy)
            ));
        }
    }

    #[test]
    fn gateway_failures_split_on_kind() {
        assert_eq!(
            transition(
                &WorkflowState::Processing,
                WorkflowEvent::GatewayFailed(PaymentFailure::GatewayUnavailable)
            )
            .expect("edge"),
            WorkflowState::Error(PaymentFailure::GatewayUnavailable)
        );
        assert_eq!(
            transition(
                &WorkflowState::Processing,
                WorkflowEvent::GatewayFailed(PaymentFailure::BookingNotFound)
            )
            .expect("edge"),
            WorkflowState::Booking
        );
    }

    #[test]
    fn error_step_offers_retry_back_and_cancel() {
        let error = WorkflowState::Error(PaymentFailure::Unknown);
        assert_eq!(
            transition(&error, WorkflowEvent::Retry).expect("retry"),
            WorkflowState::Payment
        );
        assert_eq!(
            transition(&error, WorkflowEvent::Back).expect("back"),
            WorkflowState::Booking
        );
        assert_eq!(
            transition(&error, WorkflowEvent::Close).expect("cancel"),
            WorkflowState::Idle
        );
    }

    #[test]
    fn booking_cannot_skip_to_processing() {
        assert!(matches!(
            transition(&WorkflowState::Booking, WorkflowEvent::SubmitPayment),
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }
}

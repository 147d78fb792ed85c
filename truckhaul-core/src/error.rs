//! Workflow-level error taxonomy and the messages shown to users.

use crate::payment::{PaymentFailure, SIGN_IN_AGAIN};
use crate::ports::PortError;

#[derive(thiserror::Error, Debug)]
/// Everything that can go wrong inside a booking workflow.
pub enum WorkflowError {
    /// Local input is missing or invalid; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The user is not signed in; nothing was sent.
    #[error("Authentication required")]
    AuthRequired,
    /// The pricing backend could not quote the trip.
    #[error("Quote error: {0}")]
    Quote(#[source] PortError),
    /// Route geometry could not be loaded.
    #[error("Route error: {0}")]
    Route(#[source] PortError),
    /// The backend refused to create the booking.
    #[error("Booking creation error: {0}")]
    BookingCreation(#[source] PortError),
    /// The booking expired before a payment session could be opened.
    #[error("Booking not found")]
    BookingNotFound,
    /// Opening the payment session failed.
    #[error("Payment error: {0}")]
    Payment(PaymentFailure),
    /// A booking or payment request is outstanding.
    #[error("Request in progress")]
    Busy,
    /// Trip fields cannot change once a booking exists.
    #[error("Trip is locked after booking creation")]
    TripLocked,
    /// The action does not apply to the current step.
    #[error("{action} is not available while {state}")]
    InvalidTransition {
        /// Step the workflow is in.
        state: &'static str,
        /// Attempted action.
        action: &'static str,
    },
}

impl WorkflowError {
    /// Banner text for the user. Never includes transport details.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Validation(reason) => reason.clone(),
            WorkflowError::AuthRequired => "Please sign in to book a truck.".to_owned(),
            WorkflowError::Quote(PortError::Unauthorized)
            | WorkflowError::BookingCreation(PortError::Unauthorized) => SIGN_IN_AGAIN.to_owned(),
            WorkflowError::Quote(_) => {
                "We couldn't price this trip right now. Try again in a moment.".to_owned()
            }
            WorkflowError::Route(_) => "Route preview is unavailable.".to_owned(),
            WorkflowError::BookingCreation(PortError::Rejected(reason)) => {
                format!("Booking was not accepted: {reason}")
            }
            WorkflowError::BookingCreation(_) => {
                "We couldn't create your booking. Please try again.".to_owned()
            }
            WorkflowError::BookingNotFound => {
                "Your booking expired. Please confirm the trip again.".to_owned()
            }
            WorkflowError::Payment(failure) => failure.user_message().to_owned(),
            WorkflowError::Busy => "Still working on your last request, please wait.".to_owned(),
            WorkflowError::TripLocked => {
                "The trip can't be changed after the booking is created.".to_owned()
            }
            WorkflowError::InvalidTransition { .. } => {
                "That action isn't available right now.".to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_details_stay_out_of_user_messages() {
        let err = WorkflowError::Quote(PortError::Decode("expected f64 at line 1".into()));
        assert!(!err.user_message().contains("f64"));
        assert!(err.to_string().contains("f64"));
    }

    #[test]
    fn expired_session_asks_to_sign_in_everywhere() {
        for err in [
            WorkflowError::Quote(PortError::Unauthorized),
            WorkflowError::BookingCreation(PortError::Unauthorized),
            WorkflowError::Payment(PaymentFailure::Unauthorized),
        ] {
            assert_eq!(err.user_message(), SIGN_IN_AGAIN, "{err:?}");
        }
    }

    #[test]
    fn server_rejection_reason_is_shown() {
        let err = WorkflowError::BookingCreation(PortError::Rejected("Driver unavailable".into()));
        assert_eq!(
            err.user_message(),
            "Booking was not accepted: Driver unavailable"
        );
    }
}

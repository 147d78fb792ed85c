//! Hands a created booking off to the hosted payment gateway.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::model::GatewaySession;
use crate::ports::{PaymentPort, PaymentRequest, PortError};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Classified reasons a payment session could not be opened.
pub enum PaymentFailure {
    /// The booking vanished or expired; it has to be created again.
    #[error("booking not found")]
    BookingNotFound,
    /// The gateway or its upstream is temporarily down.
    #[error("gateway unavailable")]
    GatewayUnavailable,
    /// No answer within the configured bound.
    #[error("gateway timed out")]
    Timeout,
    /// The backend no longer accepts the session token.
    #[error("session expired")]
    Unauthorized,
    /// Anything else.
    #[error("unknown payment failure")]
    Unknown,
}

impl PaymentFailure {
    /// Map a backend error to a payment failure kind.
    #[must_use]
    pub fn classify(err: &PortError) -> Self {
        match err {
            PortError::NotFound => PaymentFailure::BookingNotFound,
            PortError::Unauthorized => PaymentFailure::Unauthorized,
            PortError::Network(inner) if inner.is_timeout() => PaymentFailure::Timeout,
            other if other.is_transient() => PaymentFailure::GatewayUnavailable,
            _ => PaymentFailure::Unknown,
        }
    }

    /// Whether the user can retry from the error step.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        !matches!(
            self,
            PaymentFailure::BookingNotFound | PaymentFailure::Unauthorized
        )
    }

    /// Banner text for the user.
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            PaymentFailure::BookingNotFound => "Your booking expired. Please confirm the trip again.",
            PaymentFailure::GatewayUnavailable => {
                "The payment gateway is unavailable. Please retry in a moment."
            }
            PaymentFailure::Timeout => "The payment gateway did not respond. Please retry.",
            PaymentFailure::Unauthorized => SIGN_IN_AGAIN,
            PaymentFailure::Unknown => "We couldn't start the payment. Please retry.",
        }
    }
}

pub(crate) const SIGN_IN_AGAIN: &str = "Your session has expired. Please sign in again.";

/// Opens gateway sessions with a bounded wait. Performs no retries of its own.
#[derive(Clone)]
pub struct PaymentGatewayAdapter {
    port: Arc<dyn PaymentPort>,
    timeout: Duration,
}

impl PaymentGatewayAdapter {
    /// Wrap a payment port.
    #[must_use]
    pub fn new(port: Arc<dyn PaymentPort>, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    /// Request a gateway session for a booking.
    ///
    /// # Errors
    ///
    /// Returns the classified [`PaymentFailure`] when the session cannot be opened in time.
    pub async fn initiate(&self, request: &PaymentRequest) -> Result<GatewaySession, PaymentFailure> {
        debug!(booking = %request.booking_id, "requesting payment session");
        let outcome = tokio::time::timeout(self.timeout, self.port.create_session(request)).await;
        match outcome {
            Ok(Ok(session)) if !session.gateway_url.trim().is_empty() => Ok(session),
            Ok(Ok(_)) => {
                warn!(booking = %request.booking_id, "payment session came back without a gateway url");
                Err(PaymentFailure::Unknown)
            }
            Ok(Err(err)) => {
                let failure = PaymentFailure::classify(&err);
                warn!(booking = %request.booking_id, error = %err, ?failure, "payment session failed");
                Err(failure)
            }
            Err(_elapsed) => {
                warn!(booking = %request.booking_id, timeout = ?self.timeout, "payment session timed out");
                Err(PaymentFailure::Timeout)
            }
        }
    }
}

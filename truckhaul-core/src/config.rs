//! Tunables for a workflow instance.

use std::time::Duration;

use serde::Deserialize;

/// What to do when the pricing backend fails to quote a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarePolicy {
    /// Leave the fare at zero and block submission until a quote succeeds.
    #[default]
    Strict,
    /// Apply the configured fallback fare and distance so the trip can still be booked.
    Fallback,
}

/// Workflow configuration, usually deserialized from a JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Maximum number of catalog areas fetched when the workflow opens.
    pub area_limit: usize,
    /// Maximum number of suggestions returned per lookup.
    pub suggestion_limit: usize,
    /// Settle delay for text-driven lookups and quote refreshes, in milliseconds.
    pub debounce_ms: u64,
    /// Upper bound on a payment session request, in seconds.
    pub payment_timeout_secs: u64,
    /// Upper bound on any other backend request, in seconds.
    pub request_timeout_secs: u64,
    /// Behaviour on quote failure.
    pub fare_policy: FarePolicy,
    /// Fare applied under [`FarePolicy::Fallback`].
    pub fallback_fare: f64,
    /// Distance applied under [`FarePolicy::Fallback`].
    pub fallback_distance: f64,
    /// Postal code sent when none can be derived.
    pub default_post_code: String,
    /// Country sent with every payment session.
    pub default_country: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            area_limit: 500,
            suggestion_limit: 50,
            debounce_ms: 350,
            payment_timeout_secs: 30,
            request_timeout_secs: 20,
            fare_policy: FarePolicy::Strict,
            fallback_fare: 500.0,
            fallback_distance: 10.0,
            default_post_code: String::from("1000"),
            default_country: String::from("Bangladesh"),
        }
    }
}

impl WorkflowConfig {
    /// Debounce window as a [`Duration`].
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Payment timeout as a [`Duration`].
    #[must_use]
    pub fn payment_timeout(&self) -> Duration {
        Duration::from_secs(self.payment_timeout_secs)
    }

    /// Per-request timeout for HTTP clients.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

//! Settle-window helper for text-driven requests.

use std::time::{Duration, Instant};

/// Fires once after input has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    /// Record new input, restarting the settle window.
    pub fn touch(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    /// Whether input is waiting to settle.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Returns true exactly once when the window has elapsed since the last touch.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    /// Drop pending input without firing.
    pub fn cancel(&mut self) {
        self.pending_since = None;
    }
}

//! Bundle of backend ports handed to a workflow instance.

use std::sync::Arc;

use crate::ports::{AreaPort, BookingPort, PaymentPort, QuotePort};

/// Collection of ports implementing the marketplace backend.
#[derive(Clone)]
pub struct Backend {
    /// Area catalog.
    pub areas: Arc<dyn AreaPort>,
    /// Fare and route quotes.
    pub quotes: Arc<dyn QuotePort>,
    /// Booking creation.
    pub bookings: Arc<dyn BookingPort>,
    /// Payment sessions.
    pub payments: Arc<dyn PaymentPort>,
}

impl Backend {
    /// Bundle four independent port implementations.
    #[must_use]
    pub fn new(
        areas: Arc<dyn AreaPort>,
        quotes: Arc<dyn QuotePort>,
        bookings: Arc<dyn BookingPort>,
        payments: Arc<dyn PaymentPort>,
    ) -> Self {
        Self {
            areas,
            quotes,
            bookings,
            payments,
        }
    }

    /// Bundle a single type that implements every port.
    #[must_use]
    pub fn from_shared<T>(backend: Arc<T>) -> Self
    where
        T: AreaPort + QuotePort + BookingPort + PaymentPort + 'static,
    {
        Self::new(
            Arc::clone(&backend) as Arc<dyn AreaPort>,
            Arc::clone(&backend) as Arc<dyn QuotePort>,
            Arc::clone(&backend) as Arc<dyn BookingPort>,
            backend,
        )
    }
}

//! Fare and route quoting, reconciled by input identity rather than arrival order.

use tracing::debug;

use crate::model::{CoordinatePair, FareQuote, RouteDetails};
use crate::ports::{FareRequest, PortError, QuotePort, RouteRequest};

/// Identifies the inputs a quote was requested for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteTicket {
    generation: u64,
    pair: CoordinatePair,
}

impl QuoteTicket {
    /// Monotonic request counter value.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Coordinates the quote was requested for.
    #[must_use]
    pub fn pair(&self) -> CoordinatePair {
        self.pair
    }
}

/// Both requests for one coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    /// Input identity.
    pub ticket: QuoteTicket,
    /// Pricing request.
    pub fare: FareRequest,
    /// Routing request.
    pub route: RouteRequest,
}

/// Independent outcomes of a [`QuoteRequest`].
#[derive(Debug)]
pub struct QuoteResults {
    /// Input identity the results belong to.
    pub ticket: QuoteTicket,
    /// Pricing outcome; blocks submission on failure.
    pub fare: Result<FareQuote, PortError>,
    /// Routing outcome; only the map preview depends on it.
    pub route: Result<RouteDetails, PortError>,
}

/// Tracks which coordinate pair quotes are currently valid for.
#[derive(Debug, Clone, Default)]
pub struct RouteQuoteService {
    generation: u64,
    current: Option<CoordinatePair>,
    issued: bool,
}

impl RouteQuoteService {
    /// Create a tracker with nothing requested yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the tracker at `pair`.
    ///
    /// Returns a ticket when a request should be sent: the pair changed, or nothing was
    /// issued for it yet. Any change, including to `None`, supersedes tickets in flight.
    pub fn refresh(&mut self, pair: Option<CoordinatePair>) -> Option<QuoteTicket> {
        if pair == self.current && (self.issued || pair.is_none()) {
            return None;
        }
        self.generation += 1;
        self.current = pair;
        self.issued = pair.is_some();
        pair.map(|pair| self.ticket(pair))
    }

    /// Issue a fresh ticket for the current pair, superseding any in flight.
    pub fn retry(&mut self) -> Option<QuoteTicket> {
        let pair = self.current?;
        self.generation += 1;
        self.issued = true;
        Some(self.ticket(pair))
    }

    /// Forget the current pair and supersede everything in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.current = None;
        self.issued = false;
    }

    /// Whether results for `ticket` may still be applied.
    #[must_use]
    pub fn is_current(&self, ticket: &QuoteTicket) -> bool {
        let current = ticket.generation == self.generation && Some(ticket.pair) == self.current;
        if !current {
            debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "discarding stale quote"
            );
        }
        current
    }

    fn ticket(&self, pair: CoordinatePair) -> QuoteTicket {
        QuoteTicket {
            generation: self.generation,
            pair,
        }
    }
}

/// Run both quote calls concurrently, keeping their outcomes separate.
pub async fn fetch_quotes(port: &dyn QuotePort, request: &QuoteRequest) -> QuoteResults {
    let (fare, route) = tokio::join!(port.fare(&request.fare), port.route(&request.route));
    QuoteResults {
        ticket: request.ticket,
        fare,
        route,
    }
}

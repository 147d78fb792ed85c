//! Traits describing the backend capabilities the workflow consumes, plus their request shapes.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Error as ReqwestError;
use serde::Serialize;

use crate::model::{
    Area, BookingId, BookingRecord, Coordinate, CustomerInfo, DriverId, FareQuote,
    GatewaySession, RouteDetails, TruckType,
};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the backend.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The session token was missing or rejected.
    #[error("Unauthorized")]
    Unauthorized,
    /// The addressed resource does not exist.
    #[error("Not found")]
    NotFound,
    /// The backend refused the request with a client error.
    #[error("Rejected: {0}")]
    Rejected(String),
    /// An upstream dependency of the backend is down.
    #[error("Service unavailable ({0})")]
    Unavailable(u16),
    /// Any other unexpected status.
    #[error("Unexpected status {0}")]
    Status(u16),
    /// The response body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl PortError {
    /// Whether the failure is likely to go away on its own.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            PortError::Network(err) => err.is_connect() || err.is_timeout(),
            PortError::Unavailable(_) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Trip endpoint as sent to the pricing and routing endpoints.
pub struct QuotePoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Free-text address shown to the user.
    pub address: String,
}

impl QuotePoint {
    /// Build a quote point from a coordinate and its label.
    #[must_use]
    pub fn new(coordinate: Coordinate, address: impl Into<String>) -> Self {
        Self {
            lat: coordinate.lat,
            lng: coordinate.lng,
            address: address.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Body of a fare quote request.
pub struct FareRequest {
    /// Pickup point.
    pub source: QuotePoint,
    /// Delivery point.
    pub destination: QuotePoint,
    /// Vehicle class to price.
    pub truck_type: TruckType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Body of a route details request.
pub struct RouteRequest {
    /// Pickup point.
    pub source: QuotePoint,
    /// Delivery point.
    pub destination: QuotePoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Body of a booking creation request.
pub struct NewBooking {
    /// Driver the booking is addressed to.
    pub driver_id: DriverId,
    /// Pickup text.
    pub source: String,
    /// Destination text.
    pub destination: String,
    /// Pickup latitude.
    pub source_lat: f64,
    /// Pickup longitude.
    pub source_lng: f64,
    /// Destination latitude.
    pub dest_lat: f64,
    /// Destination longitude.
    pub dest_lng: f64,
    /// Quoted distance in kilometres.
    pub distance: f64,
    /// Quoted fare in taka.
    pub fare: f64,
    /// Requested pickup time, local to the marketplace.
    pub pickup_time: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Body of a payment session request.
pub struct PaymentRequest {
    /// Booking being paid for.
    pub booking_id: BookingId,
    /// Customer and shipping details.
    pub customer_info: CustomerInfo,
}

#[async_trait]
/// Catalog of named, geocoded areas.
pub trait AreaPort: Send + Sync {
    /// Fetch areas, optionally narrowed by a backend-side query.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn areas(&self, query: Option<&str>, limit: usize) -> Result<Vec<Area>, PortError>;
}

#[async_trait]
/// Pricing and routing backend.
pub trait QuotePort: Send + Sync {
    /// Price a trip for a vehicle class.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when pricing fails or rejects the trip.
    async fn fare(&self, request: &FareRequest) -> Result<FareQuote, PortError>;

    /// Compute route geometry between two points.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when routing fails.
    async fn route(&self, request: &RouteRequest) -> Result<RouteDetails, PortError>;
}

#[async_trait]
/// Booking persistence.
pub trait BookingPort: Send + Sync {
    /// Create a booking record.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend rejects the booking.
    async fn create(&self, booking: &NewBooking) -> Result<BookingRecord, PortError>;
}

#[async_trait]
/// Hosted payment gateway sessions.
pub trait PaymentPort: Send + Sync {
    /// Open a gateway session for an existing booking.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::NotFound`] when the booking no longer exists, or another
    /// [`PortError`] when the gateway cannot be reached.
    async fn create_session(&self, request: &PaymentRequest) -> Result<GatewaySession, PortError>;
}

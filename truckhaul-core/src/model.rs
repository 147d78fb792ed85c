//! Domain data structures for locations, quotes, bookings, and payment sessions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Vehicle classes a fare can be quoted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TruckType {
    /// Light pickup, up to one ton.
    Pickup,
    /// Small covered or open truck.
    MiniTruck,
    /// Enclosed van for weather-sensitive loads.
    CoveredVan,
    /// Full-size open-bed truck.
    OpenTruck,
}

impl TruckType {
    /// Parse the wire slug (`PICKUP`, `MINI_TRUCK`, ...), ignoring case.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_uppercase().as_str() {
            "PICKUP" => Some(Self::Pickup),
            "MINI_TRUCK" => Some(Self::MiniTruck),
            "COVERED_VAN" => Some(Self::CoveredVan),
            "OPEN_TRUCK" => Some(Self::OpenTruck),
            _ => None,
        }
    }
}

impl fmt::Display for TruckType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TruckType::Pickup => "Pickup",
            TruckType::MiniTruck => "Mini truck",
            TruckType::CoveredVan => "Covered van",
            TruckType::OpenTruck => "Open truck",
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a catalog area.
pub struct AreaId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of the driver a booking is addressed to.
pub struct DriverId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Server-assigned booking identifier.
pub struct BookingId(pub String);

impl fmt::Display for BookingId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// WGS84 point.
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate from latitude and longitude.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Catalog entry as returned by the areas endpoint.
pub struct Area {
    /// Unique identifier.
    pub id: AreaId,
    /// Neighbourhood or landmark name.
    pub name: String,
    /// City the area belongs to.
    pub city: String,
    /// Street address or description.
    #[serde(default)]
    pub address: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
/// A user-selected, geocoded location.
pub struct ResolvedArea {
    /// Catalog identifier.
    pub id: AreaId,
    /// Display label, also written into the text field on selection.
    pub label: String,
    /// City of the area.
    pub city: String,
    /// Street address.
    pub address: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl ResolvedArea {
    /// Position of the area.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl From<Area> for ResolvedArea {
    fn from(area: Area) -> Self {
        let label = if area.city.is_empty() {
            area.name
        } else {
            format!("{}, {}", area.name, area.city)
        };
        Self {
            id: area.id,
            label,
            city: area.city,
            address: area.address,
            latitude: area.latitude,
            longitude: area.longitude,
        }
    }
}

/// The two free-text location fields of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationField {
    /// Where the load is picked up.
    Pickup,
    /// Where the load is delivered.
    Destination,
}

impl fmt::Display for LocationField {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationField::Pickup => write!(formatter, "pickup"),
            LocationField::Destination => write!(formatter, "destination"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Resolved endpoints of a trip; the identity quotes are keyed by.
pub struct CoordinatePair {
    /// Pickup position.
    pub source: Coordinate,
    /// Delivery position.
    pub destination: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Priced estimate for a trip.
pub struct FareQuote {
    /// Total fare in taka.
    pub total_fare: f64,
    /// Distance in kilometres.
    pub distance: f64,
    /// Named fare components such as base fare or per-km charge.
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Route geometry for the map preview.
pub struct RouteDetails {
    /// Distance in kilometres.
    pub distance: f64,
    /// Duration in minutes.
    pub duration: f64,
    /// Polyline as `[lng, lat]` pairs.
    #[serde(default)]
    pub route_geometry: Vec<[f64; 2]>,
    /// Intermediate points along the route.
    #[serde(default)]
    pub waypoints: Vec<Coordinate>,
}

/// Where the fare currently shown in a draft came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FareSource {
    /// No fare for the current coordinates.
    #[default]
    None,
    /// Priced by the backend.
    Quoted,
    /// Fixed default applied after a failed quote.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Booking as created by the backend.
pub struct BookingRecord {
    /// Server-assigned identifier; joins the booking to its payment session.
    pub id: BookingId,
    /// Server status, if reported.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Customer and shipping details sent with a payment session.
pub struct CustomerInfo {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Shipping address, derived from the trip.
    pub address: String,
    /// Shipping city, derived from the trip.
    pub city: String,
    /// Postal code.
    pub post_code: String,
    /// Country name.
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Hosted gateway session returned by the payments endpoint.
pub struct GatewaySession {
    /// Single-use URL of the hosted payment page.
    pub gateway_url: String,
}

/// Render a fare for display, rounded to whole taka.
#[must_use]
pub fn format_fare(amount: f64) -> String {
    format!("৳{:.0}", amount.round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truck_type_uses_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_string(&TruckType::MiniTruck).expect("serialize");
        assert_eq!(json, "\"MINI_TRUCK\"");
        assert_eq!(TruckType::from_slug("pickup"), Some(TruckType::Pickup));
        assert_eq!(TruckType::from_slug("boat"), None);
    }

    #[test]
    fn resolved_area_label_joins_name_and_city() {
        let area = Area {
            id: AreaId("a1".into()),
            name: "Gulshan".into(),
            city: "Dhaka".into(),
            address: "Gulshan Avenue".into(),
            latitude: 23.7925,
            longitude: 90.4078,
        };
        let resolved = ResolvedArea::from(area);
        assert_eq!(resolved.label, "Gulshan, Dhaka");
        assert_eq!(resolved.coordinate(), Coordinate::new(23.7925, 90.4078));
    }

    #[test]
    fn fare_is_shown_in_whole_taka() {
        assert_eq!(format_fare(450.0), "৳450");
        assert_eq!(format_fare(449.6), "৳450");
    }

    #[test]
    fn fare_quote_breakdown_is_optional() {
        let quote: FareQuote =
            serde_json::from_str(r#"{"totalFare": 450, "distance": 9.2}"#).expect("decode");
        assert!((quote.total_fare - 450.0).abs() < f64::EPSILON);
        assert!(quote.breakdown.is_empty());
    }
}

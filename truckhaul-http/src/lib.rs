//! REST backend for truckhaul using the marketplace JSON API.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use truckhaul_core::{
    model::{Area, BookingRecord, FareQuote, GatewaySession, RouteDetails},
    ports::{
        AreaPort, BookingPort, FareRequest, NewBooking, PaymentPort, PaymentRequest, PortError,
        QuotePort, RouteRequest,
    },
};

/// Responses either come bare or wrapped in a `data` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> T {
        match self {
            Payload::Wrapped { data } => data,
            Payload::Bare(inner) => inner,
        }
    }
}

/// Error body of a rejected request.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Authenticated client for every backend port.
pub struct RestBackend {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl RestBackend {
    /// Create a backend rooted at `base_url`, optionally already signed in.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: Arc::new(RwLock::new(token)),
        }
    }

    /// Whether a bearer token is currently held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_ok_and(|token| token.is_some())
    }

    /// Forget the bearer token.
    pub fn clear_session(&self) {
        if let Ok(mut token) = self.token.write() {
            *token = None;
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let token = self.token.read().ok().and_then(|token| token.clone());
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, PortError> {
        let resp = self.authorize(req).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(self.status_error(status, &body));
        }
        serde_json::from_str::<Payload<T>>(&body)
            .map(Payload::into_inner)
            .map_err(|err| PortError::Decode(err.to_string()))
    }

    /// Map a failed response to a [`PortError`]. A 401 also ends the session.
    fn status_error(&self, status: StatusCode, body: &str) -> PortError {
        if status == StatusCode::UNAUTHORIZED {
            warn!("session rejected by backend, signing out");
            self.clear_session();
        }
        classify_status(status, body)
    }
}

fn classify_status(status: StatusCode, body: &str) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED => PortError::Unauthorized,
        StatusCode::NOT_FOUND => PortError::NotFound,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            PortError::Unavailable(status.as_u16())
        }
        client if client.is_client_error() => {
            let reason = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|body| body.message.or(body.error))
                .filter(|reason| !reason.trim().is_empty())
                .or_else(|| client.canonical_reason().map(str::to_owned))
                .unwrap_or_else(|| client.as_u16().to_string());
            PortError::Rejected(reason)
        }
        other => PortError::Status(other.as_u16()),
    }
}

#[async_trait]
impl AreaPort for RestBackend {
    async fn areas(&self, query: Option<&str>, limit: usize) -> Result<Vec<Area>, PortError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut req = self
            .client
            .get(self.url("areas"))
            .query(&[("limit", limit)]);
        if let Some(query) = query.map(str::trim).filter(|query| !query.is_empty()) {
            req = req.query(&[("query", query)]);
        }
        let mut areas = self.fetch_json::<Vec<Area>>(req).await?;
        areas.truncate(limit);
        debug!(count = areas.len(), "areas fetched");
        Ok(areas)
    }
}

#[async_trait]
impl QuotePort for RestBackend {
    async fn fare(&self, request: &FareRequest) -> Result<FareQuote, PortError> {
        self.fetch_json(self.client.post(self.url("fare/quote")).json(request))
            .await
    }

    async fn route(&self, request: &RouteRequest) -> Result<RouteDetails, PortError> {
        self.fetch_json(self.client.post(self.url("route/details")).json(request))
            .await
    }
}

#[async_trait]
impl BookingPort for RestBackend {
    async fn create(&self, booking: &NewBooking) -> Result<BookingRecord, PortError> {
        self.fetch_json(self.client.post(self.url("bookings")).json(booking))
            .await
    }
}

#[async_trait]
impl PaymentPort for RestBackend {
    async fn create_session(&self, request: &PaymentRequest) -> Result<GatewaySession, PortError> {
        self.fetch_json(self.client.post(self.url("payments/session")).json(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use truckhaul_core::model::{BookingId, Coordinate, CustomerInfo, DriverId, TruckType};
    use truckhaul_core::ports::QuotePoint;

    use super::*;

    #[test]
    fn statuses_map_to_port_errors() {
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, ""),
            PortError::NotFound
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            PortError::Unavailable(503)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            PortError::Status(500)
        ));
    }

    #[test]
    fn client_errors_carry_the_server_message() {
        let err = classify_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "Pickup time is in the past"}"#,
        );
        assert!(matches!(err, PortError::Rejected(reason) if reason == "Pickup time is in the past"));

        let err = classify_status(StatusCode::BAD_REQUEST, "<html>oops</html>");
        assert!(matches!(err, PortError::Rejected(reason) if reason == "Bad Request"));
    }

    #[test]
    fn unauthorized_response_ends_the_session() {
        let backend = RestBackend::new(Client::new(), "https://api.example.com/", Some("t0k".into()));
        assert!(backend.is_authenticated());
        assert!(matches!(
            backend.status_error(StatusCode::UNAUTHORIZED, ""),
            PortError::Unauthorized
        ));
        assert!(!backend.is_authenticated());
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let backend = RestBackend::new(Client::new(), "https://api.example.com/v1/", None);
        assert_eq!(backend.url("areas"), "https://api.example.com/v1/areas");
    }

    #[test]
    fn payloads_decode_bare_or_wrapped() {
        let wrapped: Payload<Vec<Area>> = serde_json::from_value(json!({
            "data": [{"id": "a1", "name": "Gulshan", "city": "Dhaka",
                      "address": "Gulshan Avenue", "latitude": 23.79, "longitude": 90.41}],
            "pagination": {"page": 1, "total": 1}
        }))
        .expect("wrapped");
        assert_eq!(wrapped.into_inner().len(), 1);

        let bare: Payload<GatewaySession> =
            serde_json::from_value(json!({"gatewayUrl": "https://pay.example.com/s/9"}))
                .expect("bare");
        assert_eq!(bare.into_inner().gateway_url, "https://pay.example.com/s/9");
    }

    #[test]
    fn fare_request_matches_the_wire_shape() {
        let point = |lat, lng, address: &str| QuotePoint::new(Coordinate::new(lat, lng), address);
        let request = FareRequest {
            source: point(23.79, 90.41, "Gulshan"),
            destination: point(23.73, 90.42, "Motijheel"),
            truck_type: TruckType::Pickup,
        };
        assert_eq!(
            serde_json::to_value(&request).expect("encode"),
            json!({
                "source": {"lat": 23.79, "lng": 90.41, "address": "Gulshan"},
                "destination": {"lat": 23.73, "lng": 90.42, "address": "Motijheel"},
                "truckType": "PICKUP"
            })
        );
    }

    #[test]
    fn booking_and_payment_bodies_use_camel_case() {
        let booking = NewBooking {
            driver_id: DriverId("drv-7".into()),
            source: "Gulshan".into(),
            destination: "Motijheel".into(),
            source_lat: 23.79,
            source_lng: 90.41,
            dest_lat: 23.73,
            dest_lng: 90.42,
            distance: 9.2,
            fare: 450.0,
            pickup_time: NaiveDate::from_ymd_opt(2026, 10, 20)
                .and_then(|date| date.and_hms_opt(9, 30, 0))
                .expect("time"),
        };
        let encoded = serde_json::to_value(&booking).expect("encode");
        assert_eq!(encoded["driverId"], "drv-7");
        assert_eq!(encoded["destLng"], 90.42);
        assert_eq!(encoded["pickupTime"], "2026-10-20T09:30:00");

        let payment = PaymentRequest {
            booking_id: BookingId("abc123".into()),
            customer_info: CustomerInfo {
                name: "Rahim".into(),
                email: "rahim@example.com".into(),
                phone: "017".into(),
                address: "Gulshan".into(),
                city: "Dhaka".into(),
                post_code: "1000".into(),
                country: "Bangladesh".into(),
            },
        };
        let encoded = serde_json::to_value(&payment).expect("encode");
        assert_eq!(encoded["bookingId"], "abc123");
        assert_eq!(encoded["customerInfo"]["postCode"], "1000");
    }
}

//! The booking workflow: trip collection, booking creation, and gateway handoff.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::area::AreaIndex;
use crate::backend::Backend;
use crate::config::{FarePolicy, WorkflowConfig};
use crate::draft::BookingDraft;
use crate::error::WorkflowError;
use crate::guard::{self, ExitDecision};
use crate::model::{
    AreaId, BookingId, BookingRecord, CustomerInfo, DriverId, GatewaySession, LocationField,
    ResolvedArea, RouteDetails, TruckType,
};
use crate::payment::{PaymentFailure, PaymentGatewayAdapter};
use crate::ports::{
    BookingPort, FareRequest, NewBooking, PaymentRequest, PortError, QuotePoint, QuotePort,
    RouteRequest,
};
use crate::quote::{self, QuoteRequest, QuoteResults, QuoteTicket, RouteQuoteService};
use crate::session::{ContactField, UserSession};
use crate::state::{WorkflowEvent, WorkflowState, transition};

/// What the host opened the workflow for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripContext {
    /// Driver receiving the booking.
    pub driver_id: DriverId,
    /// Vehicle class fares are quoted for.
    pub truck_type: TruckType,
}

/// Progress of the fare for the current coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStatus {
    /// Coordinates incomplete, nothing requested.
    Idle,
    /// A quote is in flight.
    Pending,
    /// The backend priced the trip.
    Ready,
    /// Pricing failed; submission is blocked.
    Failed,
    /// Pricing failed and the fallback fare was applied.
    Fallback,
}

/// Payment session request issued on entering [`WorkflowState::Processing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTicket {
    request: PaymentRequest,
}

impl PaymentTicket {
    /// Body to send to the payment gateway.
    #[must_use]
    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }
}

/// Full-page navigation target. Consumed once; the workflow keeps no copy.
#[derive(Debug, PartialEq, Eq)]
pub struct Handoff {
    gateway_url: String,
}

impl Handoff {
    /// The hosted payment page.
    #[must_use]
    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    /// Take the URL for navigation.
    #[must_use]
    pub fn into_url(self) -> String {
        self.gateway_url
    }
}

/// Booking creation request issued by [`BookingOrchestrator::begin_booking`].
#[derive(Debug, Clone, PartialEq)]
pub struct BookingTicket {
    attempt: u64,
    booking: NewBooking,
}

impl BookingTicket {
    /// Body to send to the booking backend.
    #[must_use]
    pub fn booking(&self) -> &NewBooking {
        &self.booking
    }
}

/// One workflow instance, from open to close or handoff.
pub struct BookingOrchestrator {
    backend: Backend,
    gateway: PaymentGatewayAdapter,
    config: WorkflowConfig,
    trip: TripContext,
    session: Option<UserSession>,

    state: WorkflowState,
    index: AreaIndex,
    draft: BookingDraft,
    quotes: RouteQuoteService,
    quote_status: QuoteStatus,
    route: Option<RouteDetails>,
    route_error: Option<WorkflowError>,
    customer: CustomerInfo,
    booking_id: Option<BookingId>,
    booking_attempt: u64,
    pending_booking: Option<u64>,
}

impl BookingOrchestrator {
    /// Create a closed workflow bound to a backend, a trip context, and the current session.
    #[must_use]
    pub fn new(
        backend: Backend,
        config: WorkflowConfig,
        trip: TripContext,
        session: Option<UserSession>,
    ) -> Self {
        let gateway =
            PaymentGatewayAdapter::new(Arc::clone(&backend.payments), config.payment_timeout());
        let customer = CustomerInfo::from_session(session.as_ref());
        Self {
            backend,
            gateway,
            config,
            trip,
            session,
            state: WorkflowState::Idle,
            index: AreaIndex::default(),
            draft: BookingDraft::default(),
            quotes: RouteQuoteService::new(),
            quote_status: QuoteStatus::Idle,
            route: None,
            route_error: None,
            customer,
            booking_id: None,
            booking_attempt: 0,
            pending_booking: None,
        }
    }

    /// Open the workflow and load the area catalog.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidTransition`] if the workflow is already open.
    pub async fn open(&mut self) -> Result<(), WorkflowError> {
        let next = transition(&self.state, WorkflowEvent::Open)?;
        self.index = AreaIndex::load(&*self.backend.areas, &self.config).await;
        self.state = next;
        info!(
            driver = %self.trip.driver_id.0,
            truck = %self.trip.truck_type,
            areas = self.index.len(),
            "booking workflow opened"
        );
        Ok(())
    }

    /// Current step.
    #[must_use]
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Trip collected so far.
    #[must_use]
    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Trip context the workflow was opened for.
    #[must_use]
    pub fn trip(&self) -> &TripContext {
        &self.trip
    }

    /// Contact and shipping details for the payment step.
    #[must_use]
    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Booking created by this workflow instance, if any.
    #[must_use]
    pub fn booking_id(&self) -> Option<&BookingId> {
        self.booking_id.as_ref()
    }

    /// Route preview for the current coordinates.
    #[must_use]
    pub fn route(&self) -> Option<&RouteDetails> {
        self.route.as_ref()
    }

    /// Why the route preview is missing, if its request failed. Never blocks submission.
    #[must_use]
    pub fn route_error(&self) -> Option<&WorkflowError> {
        self.route_error.as_ref()
    }

    /// Whether a booking creation request is outstanding.
    #[must_use]
    pub fn is_creating_booking(&self) -> bool {
        self.pending_booking.is_some()
    }

    /// Whether the workflow still holds a signed-in user.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Drop the user session, e.g. after the backend rejected its token.
    ///
    /// The next submit then fails with [`WorkflowError::AuthRequired`] without a request.
    pub fn sign_out(&mut self) {
        if self.session.take().is_some() {
            warn!("session rejected, signed out of the workflow");
        }
    }

    /// Progress of the fare quote.
    #[must_use]
    pub fn quote_status(&self) -> QuoteStatus {
        self.quote_status
    }

    /// Loaded area catalog.
    #[must_use]
    pub fn areas(&self) -> &AreaIndex {
        &self.index
    }

    /// Payment adapter, for hosts that run the gateway call off the event loop.
    #[must_use]
    pub fn gateway(&self) -> PaymentGatewayAdapter {
        self.gateway.clone()
    }

    /// Booking backend, for hosts that run booking creation off the event loop.
    #[must_use]
    pub fn booking_port(&self) -> Arc<dyn BookingPort> {
        Arc::clone(&self.backend.bookings)
    }

    /// Quote backend, for hosts that run quote requests off the event loop.
    #[must_use]
    pub fn quote_port(&self) -> Arc<dyn QuotePort> {
        Arc::clone(&self.backend.quotes)
    }

    /// Suggestions for a location field. Empty once the field is resolved.
    #[must_use]
    pub fn suggestions(&self, field: LocationField) -> Vec<&ResolvedArea> {
        let input = self.draft.location(field);
        if input.resolved().is_some() {
            return Vec::new();
        }
        self.index.query(input.text())
    }

    /// Whether "Continue to Payment" should be enabled.
    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.state == WorkflowState::Booking
            && self.draft.is_submittable()
            && self.draft.pickup_time().is_some()
            && self.pending_booking.is_none()
    }

    fn ensure(&self, expected: &WorkflowState, action: &'static str) -> Result<(), WorkflowError> {
        if &self.state == expected {
            Ok(())
        } else if self.state == WorkflowState::Processing {
            Err(WorkflowError::Busy)
        } else {
            Err(WorkflowError::InvalidTransition {
                state: self.state.name(),
                action,
            })
        }
    }

    fn ensure_trip_editable(&self, action: &'static str) -> Result<(), WorkflowError> {
        self.ensure(&WorkflowState::Booking, action)?;
        if self.pending_booking.is_some() {
            return Err(WorkflowError::Busy);
        }
        if self.booking_id.is_some() {
            return Err(WorkflowError::TripLocked);
        }
        Ok(())
    }

    /// Replace the free text of a location field.
    ///
    /// Changing the text drops the field's resolved area along with the fare and route
    /// that depended on it.
    ///
    /// # Errors
    ///
    /// Fails outside the booking step and with [`WorkflowError::TripLocked`] once a
    /// booking exists.
    pub fn set_location_text(
        &mut self,
        field: LocationField,
        text: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.ensure_trip_editable("edit location")?;
        if self.draft.location_mut(field).set_text(text.into()) {
            debug!(%field, "location edited, resolution cleared");
            self.invalidate_quotes();
        }
        Ok(())
    }

    /// Resolve a location field to a catalog area.
    ///
    /// Returns the quote request to send when both fields are now resolved to a new pair.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::set_location_text`], and with [`WorkflowError::Validation`] for
    /// an id that is not in the catalog.
    pub fn select_suggestion(
        &mut self,
        field: LocationField,
        id: &AreaId,
    ) -> Result<Option<QuoteRequest>, WorkflowError> {
        self.ensure_trip_editable("select location")?;
        let area = self
            .index
            .get(id)
            .cloned()
            .ok_or_else(|| WorkflowError::Validation(format!("Unknown {field} location.")))?;
        self.select_area(field, area)
    }

    /// Resolve a location field to an area obtained elsewhere.
    ///
    /// # Errors
    ///
    /// Fails outside the booking step and once a booking exists.
    pub fn select_area(
        &mut self,
        field: LocationField,
        area: ResolvedArea,
    ) -> Result<Option<QuoteRequest>, WorkflowError> {
        self.ensure_trip_editable("select location")?;
        debug!(%field, area = %area.id.0, "location resolved");
        self.draft.location_mut(field).select(area);
        Ok(self.quote_request())
    }

    /// Set or clear the requested pickup time.
    ///
    /// # Errors
    ///
    /// Fails outside the booking step and once a booking exists.
    pub fn set_pickup_time(&mut self, time: Option<NaiveDateTime>) -> Result<(), WorkflowError> {
        self.ensure_trip_editable("edit pickup time")?;
        self.draft.set_pickup_time(time);
        Ok(())
    }

    /// Quote request for the current coordinates, if one is due.
    pub fn quote_request(&mut self) -> Option<QuoteRequest> {
        if !self.quotes_allowed() {
            return None;
        }
        let ticket = self.quotes.refresh(self.draft.coordinate_pair())?;
        Some(self.begin_quote(ticket))
    }

    /// Request the quote again for unchanged coordinates, e.g. after a failure.
    pub fn retry_quote(&mut self) -> Option<QuoteRequest> {
        if !self.quotes_allowed() {
            return None;
        }
        let ticket = self.quotes.retry()?;
        Some(self.begin_quote(ticket))
    }

    fn quotes_allowed(&self) -> bool {
        self.state == WorkflowState::Booking
            && self.booking_id.is_none()
            && self.pending_booking.is_none()
    }

    fn begin_quote(&mut self, ticket: QuoteTicket) -> QuoteRequest {
        self.draft.clear_fare();
        self.route = None;
        self.route_error = None;
        self.quote_status = QuoteStatus::Pending;

        let pair = ticket.pair();
        let source = QuotePoint::new(pair.source, self.draft.source());
        let destination = QuotePoint::new(pair.destination, self.draft.destination());
        debug!(generation = ticket.generation(), "quote requested");
        QuoteRequest {
            ticket,
            fare: FareRequest {
                source: source.clone(),
                destination: destination.clone(),
                truck_type: self.trip.truck_type,
            },
            route: RouteRequest {
                source,
                destination,
            },
        }
    }

    fn invalidate_quotes(&mut self) {
        let pending = self.quotes.refresh(self.draft.coordinate_pair());
        debug_assert!(pending.is_none(), "an unresolved field cannot yield a pair");
        self.draft.clear_fare();
        self.route = None;
        self.route_error = None;
        self.quote_status = QuoteStatus::Idle;
    }

    /// Apply the outcome of a quote request. Results for superseded inputs are dropped.
    ///
    /// A route failure only removes the preview. A fare failure either surfaces as an
    /// error or applies the fallback fare, depending on [`FarePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Quote`] when pricing failed under [`FarePolicy::Strict`].
    pub fn apply_quotes(&mut self, results: QuoteResults) -> Result<(), WorkflowError> {
        if self.state != WorkflowState::Booking || !self.quotes.is_current(&results.ticket) {
            return Ok(());
        }

        match results.route {
            Ok(route) => {
                self.route = Some(route);
                self.route_error = None;
            }
            Err(err) => {
                warn!(error = %err, "route preview unavailable");
                if matches!(err, PortError::Unauthorized) {
                    self.sign_out();
                }
                self.route = None;
                self.route_error = Some(WorkflowError::Route(err));
            }
        }

        match results.fare {
            Ok(quote) if quote.total_fare > 0.0 => {
                info!(fare = quote.total_fare, distance = quote.distance, "fare quoted");
                self.draft.apply_quote(quote);
                self.quote_status = QuoteStatus::Ready;
                Ok(())
            }
            Ok(quote) => self.quote_failed(PortError::Decode(format!(
                "non-positive fare {}",
                quote.total_fare
            ))),
            Err(err) => self.quote_failed(err),
        }
    }

    fn quote_failed(&mut self, err: PortError) -> Result<(), WorkflowError> {
        if matches!(err, PortError::Unauthorized) {
            self.sign_out();
        }
        match self.config.fare_policy {
            FarePolicy::Strict => {
                warn!(error = %err, "fare quote failed");
                self.draft.clear_fare();
                self.quote_status = QuoteStatus::Failed;
                Err(WorkflowError::Quote(err))
            }
            FarePolicy::Fallback => {
                warn!(
                    error = %err,
                    fare = self.config.fallback_fare,
                    "fare quote failed, applying fallback fare"
                );
                self.draft
                    .apply_fallback(self.config.fallback_fare, self.config.fallback_distance);
                self.quote_status = QuoteStatus::Fallback;
                Ok(())
            }
        }
    }

    /// Request and apply quotes inline, if the coordinates call for it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply_quotes`].
    pub async fn refresh_quotes(&mut self) -> Result<(), WorkflowError> {
        let Some(request) = self.quote_request() else {
            return Ok(());
        };
        let results = quote::fetch_quotes(&*self.backend.quotes, &request).await;
        self.apply_quotes(results)
    }

    /// Create the booking (once per workflow instance) and move to the payment step.
    ///
    /// If this instance already created a booking the step is entered without another
    /// create call.
    ///
    /// # Errors
    ///
    /// Same as [`Self::begin_booking`] and [`Self::finish_booking`].
    pub async fn continue_to_payment(&mut self) -> Result<(), WorkflowError> {
        let Some(ticket) = self.begin_booking()? else {
            return Ok(());
        };
        let outcome = self.backend.bookings.create(ticket.booking()).await;
        self.finish_booking(ticket, outcome)
    }

    /// Start leaving the booking step.
    ///
    /// Returns `None` when the booking already exists and the payment step was entered
    /// directly. Otherwise the returned ticket must be sent and its outcome passed to
    /// [`Self::finish_booking`]; until then the trip cannot change and no second booking
    /// can be started.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::AuthRequired`] without a session and [`WorkflowError::Validation`]
    /// for an incomplete trip, both before any request. [`WorkflowError::Busy`] while a
    /// booking request is outstanding.
    pub fn begin_booking(&mut self) -> Result<Option<BookingTicket>, WorkflowError> {
        let next = transition(&self.state, WorkflowEvent::ProceedToPayment)?;
        if self.pending_booking.is_some() {
            return Err(WorkflowError::Busy);
        }
        if self.session.is_none() {
            warn!("booking attempted without a session");
            return Err(WorkflowError::AuthRequired);
        }

        if let Some(id) = &self.booking_id {
            debug!(booking = %id, "booking already exists, skipping creation");
            self.enter_payment(next);
            return Ok(None);
        }

        let booking = self.new_booking()?;
        self.booking_attempt += 1;
        self.pending_booking = Some(self.booking_attempt);
        info!(driver = %booking.driver_id.0, fare = booking.fare, "creating booking");
        Ok(Some(BookingTicket {
            attempt: self.booking_attempt,
            booking,
        }))
    }

    /// Apply the outcome of a booking request.
    ///
    /// Outcomes for a ticket that is no longer outstanding, e.g. after the workflow was
    /// closed, are dropped.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::BookingCreation`] when the backend refuses; the workflow stays on
    /// the booking step with the draft intact. A rejected token also signs the workflow out.
    pub fn finish_booking(
        &mut self,
        ticket: BookingTicket,
        outcome: Result<BookingRecord, PortError>,
    ) -> Result<(), WorkflowError> {
        if self.state != WorkflowState::Booking || self.pending_booking != Some(ticket.attempt) {
            debug!(attempt = ticket.attempt, "booking outcome for a closed request dropped");
            return Ok(());
        }
        self.pending_booking = None;

        match outcome {
            Ok(record) => {
                info!(booking = %record.id, "booking created");
                let next = transition(&self.state, WorkflowEvent::ProceedToPayment)?;
                self.booking_id = Some(record.id);
                self.enter_payment(next);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "booking creation failed");
                if matches!(err, PortError::Unauthorized) {
                    self.sign_out();
                }
                Err(WorkflowError::BookingCreation(err))
            }
        }
    }

    fn new_booking(&self) -> Result<NewBooking, WorkflowError> {
        let source = self
            .draft
            .location(LocationField::Pickup)
            .resolved()
            .ok_or_else(|| {
                WorkflowError::Validation("Pick the pickup location from the suggestions.".into())
            })?;
        let destination = self
            .draft
            .location(LocationField::Destination)
            .resolved()
            .ok_or_else(|| {
                WorkflowError::Validation(
                    "Pick the destination from the suggestions.".into(),
                )
            })?;
        if self.draft.fare() <= 0.0 {
            return Err(WorkflowError::Validation(
                "No fare is available for this trip yet.".into(),
            ));
        }
        let pickup_time = self
            .draft
            .pickup_time()
            .ok_or_else(|| WorkflowError::Validation("Choose a pickup time.".into()))?;

        Ok(NewBooking {
            driver_id: self.trip.driver_id.clone(),
            source: self.draft.source().to_owned(),
            destination: self.draft.destination().to_owned(),
            source_lat: source.latitude,
            source_lng: source.longitude,
            dest_lat: destination.latitude,
            dest_lng: destination.longitude,
            distance: self.draft.distance(),
            fare: self.draft.fare(),
            pickup_time,
        })
    }

    fn enter_payment(&mut self, next: WorkflowState) {
        self.customer.derive_shipping(
            self.draft.source(),
            self.draft.destination(),
            self.draft.location(LocationField::Pickup).resolved(),
            &self.config,
        );
        self.state = next;
    }

    /// Edit a contact field on the payment step.
    ///
    /// # Errors
    ///
    /// Fails outside the payment step.
    pub fn set_contact(
        &mut self,
        field: ContactField,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.ensure(&WorkflowState::Payment, "edit contact details")?;
        self.customer.set_contact(field, value.into());
        Ok(())
    }

    /// Return to the trip step without touching the booking.
    ///
    /// # Errors
    ///
    /// Fails outside the payment and error steps.
    pub fn back(&mut self) -> Result<(), WorkflowError> {
        self.state = transition(&self.state, WorkflowEvent::Back)?;
        debug!("back to trip step");
        Ok(())
    }

    /// Validate contact details and enter [`WorkflowState::Processing`].
    ///
    /// The returned ticket must be passed to [`Self::finish_payment`] with the gateway
    /// outcome; until then every other action is rejected as busy.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Validation`] for missing contacts and [`WorkflowError::AuthRequired`]
    /// after the session was rejected, both leaving the workflow on the payment step.
    pub fn begin_payment(&mut self) -> Result<PaymentTicket, WorkflowError> {
        let next = transition(&self.state, WorkflowEvent::SubmitPayment)?;
        if self.session.is_none() {
            return Err(WorkflowError::AuthRequired);
        }
        let missing = self.customer.missing_contacts();
        if !missing.is_empty() {
            return Err(WorkflowError::Validation(format!(
                "Please fill in: {}.",
                missing.join(", ")
            )));
        }
        let Some(booking_id) = self.booking_id.clone() else {
            return Err(WorkflowError::BookingNotFound);
        };

        self.state = next;
        info!(booking = %booking_id, "payment processing");
        Ok(PaymentTicket {
            request: PaymentRequest {
                booking_id,
                customer_info: self.customer.clone(),
            },
        })
    }

    /// Leave [`WorkflowState::Processing`] with the gateway outcome.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Payment`] for a retryable failure (now on the error step),
    /// [`WorkflowError::BookingNotFound`] when the booking expired (back on the trip step
    /// with the booking forgotten), and [`WorkflowError::InvalidTransition`] for a ticket
    /// that does not belong to the outstanding request.
    pub fn finish_payment(
        &mut self,
        ticket: PaymentTicket,
        outcome: Result<GatewaySession, PaymentFailure>,
    ) -> Result<Handoff, WorkflowError> {
        if self.state != WorkflowState::Processing
            || self.booking_id.as_ref() != Some(&ticket.request.booking_id)
        {
            return Err(WorkflowError::InvalidTransition {
                state: self.state.name(),
                action: "finish payment",
            });
        }

        match outcome {
            Ok(session) => {
                self.state = transition(&self.state, WorkflowEvent::GatewayReady)?;
                info!(booking = %ticket.request.booking_id, "handing off to payment gateway");
                Ok(Handoff {
                    gateway_url: session.gateway_url,
                })
            }
            Err(failure) => {
                self.state = transition(&self.state, WorkflowEvent::GatewayFailed(failure))?;
                if failure == PaymentFailure::BookingNotFound {
                    warn!(booking = %ticket.request.booking_id, "booking expired before payment");
                    self.booking_id = None;
                    Err(WorkflowError::BookingNotFound)
                } else {
                    if failure == PaymentFailure::Unauthorized {
                        self.sign_out();
                    }
                    Err(WorkflowError::Payment(failure))
                }
            }
        }
    }

    /// Open the gateway session inline and return the handoff.
    ///
    /// # Errors
    ///
    /// Same as [`Self::begin_payment`] and [`Self::finish_payment`].
    pub async fn pay(&mut self) -> Result<Handoff, WorkflowError> {
        let ticket = self.begin_payment()?;
        let outcome = self.gateway.initiate(ticket.request()).await;
        self.finish_payment(ticket, outcome)
    }

    /// Go back to the payment step from the error step, keeping the booking.
    ///
    /// # Errors
    ///
    /// Fails outside the error step.
    pub fn retry(&mut self) -> Result<(), WorkflowError> {
        self.state = transition(&self.state, WorkflowEvent::Retry)?;
        info!(booking = ?self.booking_id.as_ref().map(|id| id.0.as_str()), "retrying payment");
        Ok(())
    }

    /// How a close request would be handled right now.
    #[must_use]
    pub fn exit_decision(&self) -> ExitDecision {
        guard::exit_decision(&self.state, &self.draft)
    }

    /// Handle a close request: closes immediately unless confirmation is needed.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Busy`] while a payment session is in flight.
    pub fn request_close(&mut self) -> Result<ExitDecision, WorkflowError> {
        match self.exit_decision() {
            ExitDecision::Blocked => Err(WorkflowError::Busy),
            ExitDecision::Confirm => Ok(ExitDecision::Confirm),
            ExitDecision::Close => {
                self.close()?;
                Ok(ExitDecision::Close)
            }
        }
    }

    /// Close after the user confirmed discarding their input.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Busy`] while a payment session is in flight.
    pub fn confirm_close(&mut self) -> Result<(), WorkflowError> {
        self.close()
    }

    fn close(&mut self) -> Result<(), WorkflowError> {
        self.state = transition(&self.state, WorkflowEvent::Close)?;
        self.draft = BookingDraft::default();
        self.quotes.reset();
        self.quote_status = QuoteStatus::Idle;
        self.route = None;
        self.route_error = None;
        self.booking_id = None;
        self.pending_booking = None;
        self.customer = CustomerInfo::from_session(self.session.as_ref());
        info!("booking workflow closed");
        Ok(())
    }
}

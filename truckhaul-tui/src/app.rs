use std::time::Instant;

use chrono::{Duration, Local, NaiveDateTime};
use tracing::debug;
use truckhaul_core::{
    debounce::Debouncer,
    model::{BookingRecord, GatewaySession, LocationField},
    orchestrator::{BookingOrchestrator, BookingTicket, Handoff, PaymentTicket},
    payment::PaymentFailure,
    ports::PortError,
    quote::QuoteResults,
    session::ContactField,
    state::WorkflowState,
};

pub(crate) const PICKUP_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Pickup,
    Destination,
    PickupTime,
    Name,
    Email,
    Phone,
}

impl Focus {
    pub(crate) fn location(self) -> Option<LocationField> {
        match self {
            Focus::Pickup => Some(LocationField::Pickup),
            Focus::Destination => Some(LocationField::Destination),
            _ => None,
        }
    }

    pub(crate) fn contact(self) -> Option<ContactField> {
        match self {
            Focus::Name => Some(ContactField::Name),
            Focus::Email => Some(ContactField::Email),
            Focus::Phone => Some(ContactField::Phone),
            _ => None,
        }
    }

    pub(crate) fn next(self) -> Self {
        match self {
            Focus::Pickup => Focus::Destination,
            Focus::Destination => Focus::PickupTime,
            Focus::PickupTime => Focus::Pickup,
            Focus::Name => Focus::Email,
            Focus::Email => Focus::Phone,
            Focus::Phone => Focus::Name,
        }
    }
}

/// Results of work running off the event loop.
pub(crate) enum Completion {
    Quotes(QuoteResults),
    Booking(BookingTicket, Result<BookingRecord, PortError>),
    Payment(PaymentTicket, Result<GatewaySession, PaymentFailure>),
}

pub(crate) struct App {
    pub workflow: BookingOrchestrator,

    pub focus: Focus,
    pub suggestion_index: usize,
    pub suggestions_visible: bool,
    pub lookup: Debouncer,
    pub pickup_time_input: String,

    pub confirm_exit: bool,
    pub is_loading: bool,
    pub banner: Option<String>,
    pub handoff: Option<Handoff>,
}

impl App {
    pub(crate) fn new(workflow: BookingOrchestrator, lookup: Debouncer) -> Self {
        let default_pickup = (Local::now() + Duration::hours(1)).naive_local();
        Self {
            workflow,
            focus: Focus::Pickup,
            suggestion_index: 0,
            suggestions_visible: false,
            lookup,
            pickup_time_input: default_pickup.format(PICKUP_TIME_FORMAT).to_string(),
            confirm_exit: false,
            is_loading: false,
            banner: None,
            handoff: None,
        }
    }

    pub(crate) fn closed(&self) -> bool {
        matches!(self.workflow.state(), WorkflowState::Idle)
    }

    pub(crate) fn parsed_pickup_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.pickup_time_input.trim(), PICKUP_TIME_FORMAT).ok()
    }

    /// Push the pickup time text into the workflow.
    pub(crate) fn sync_pickup_time(&mut self) {
        let parsed = self.parsed_pickup_time();
        if let Err(err) = self.workflow.set_pickup_time(parsed) {
            self.banner = Some(err.user_message());
        }
    }

    /// Show suggestions once typing has settled.
    pub(crate) fn tick(&mut self, now: Instant) {
        if self.lookup.fire(now) {
            self.suggestions_visible = true;
            self.suggestion_index = 0;
        }
    }

    /// Reset per-step UI when the workflow moves to another step.
    pub(crate) fn focus_for_state(&mut self) {
        match self.workflow.state() {
            WorkflowState::Payment => {
                if self.focus.contact().is_none() {
                    self.focus = Focus::Name;
                }
            }
            WorkflowState::Booking => {
                if self.focus.contact().is_some() {
                    self.focus = Focus::Pickup;
                }
            }
            _ => {}
        }
    }

    pub(crate) fn complete(&mut self, done: Completion) {
        match done {
            Completion::Quotes(results) => {
                if let Err(err) = self.workflow.apply_quotes(results) {
                    self.banner = Some(err.user_message());
                }
            }
            Completion::Booking(ticket, outcome) => {
                self.is_loading = false;
                if let Err(err) = self.workflow.finish_booking(ticket, outcome) {
                    self.banner = Some(err.user_message());
                }
                self.focus_for_state();
            }
            Completion::Payment(ticket, outcome) => {
                self.is_loading = false;
                match self.workflow.finish_payment(ticket, outcome) {
                    Ok(handoff) => {
                        debug!("gateway handoff ready");
                        self.handoff = Some(handoff);
                    }
                    Err(err) => self.banner = Some(err.user_message()),
                }
                self.focus_for_state();
            }
        }
    }
}

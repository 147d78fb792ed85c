//! Core types and the booking-to-payment workflow for the truckhaul marketplace client.

/// Area catalog and location lookup.
pub mod area;
/// Bundle of backend ports.
pub mod backend;
/// Workflow tunables.
pub mod config;
/// Settle-window helper for text-driven requests.
pub mod debounce;
/// Trip scratch state.
pub mod draft;
/// Workflow error taxonomy.
pub mod error;
/// Close confirmation rules.
pub mod guard;
/// Domain models and identifiers.
pub mod model;
/// The workflow state machine driver.
pub mod orchestrator;
/// Payment gateway handoff.
pub mod payment;
/// Traits describing the backend interfaces.
pub mod ports;
/// Fare and route quote tracking.
pub mod quote;
/// Signed-in user identity.
pub mod session;
/// Workflow steps and transitions.
pub mod state;

pub use area::*;
pub use backend::*;
pub use config::*;
pub use debounce::*;
pub use draft::*;
pub use error::*;
pub use guard::*;
pub use model::*;
pub use orchestrator::*;
pub use payment::*;
pub use ports::*;
pub use quote::*;
pub use session::*;
pub use state::*;

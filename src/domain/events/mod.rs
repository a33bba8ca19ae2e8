//! Domain events
//!
//! Event types that represent facts about processed bundles.
//! The EventBus implementation lives in `application::events`.

pub mod types;

pub use types::{ChargeOperationsAcceptedEvent, ChargeOperationsRejectedEvent, Event, EventMessage};

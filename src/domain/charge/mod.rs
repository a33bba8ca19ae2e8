//! Charge aggregate
//!
//! Contains the Charge entity with its period timeline, identity and price
//! types, and the repository interface.

pub mod identifier;
pub mod model;
pub mod period;
pub mod price;
pub mod repository;

pub use identifier::{ChargeIdentifier, ChargeType};
pub use model::{Charge, TimelineError};
pub use period::{open_end, ChargePeriod, VatClassification};
pub use price::{Point, Resolution};
pub use repository::ChargeRepository;

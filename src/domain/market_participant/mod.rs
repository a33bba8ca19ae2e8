//! Market participant aggregate

pub mod model;
pub mod repository;

pub use model::{MarketParticipant, MarketParticipantRole};
pub use repository::MarketParticipantRepository;

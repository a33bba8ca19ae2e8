//! Storage implementations

mod memory;

pub use memory::{
    InMemoryChargeRepository, InMemoryMarketParticipantRepository, InMemoryRepositoryProvider,
};

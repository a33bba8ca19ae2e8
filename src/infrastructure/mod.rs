//! Infrastructure layer - external concerns

pub mod storage;

pub use storage::{
    InMemoryChargeRepository, InMemoryMarketParticipantRepository, InMemoryRepositoryProvider,
};

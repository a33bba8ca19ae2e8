//! # Market Charges
//!
//! Processes bundles of charge operations (create, update, stop, cancel
//! stop) submitted by market participants against tariffs, fees and
//! subscriptions.
//!
//! ## Architecture
//!
//! - **domain**: charges and their period timelines, documents, market
//!   participants, the validation rule catalogue and outcome events
//! - **application**: the bundle orchestrator, the event bus and the
//!   receipt/notification service
//! - **infrastructure**: in-memory repositories
//! - **shared**: errors, retry, logging and metrics helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};
pub use shared::telemetry::init_tracing;

pub use application::{
    create_event_bus, start_notification_worker, BundleOrchestrator, BundleOutcome,
    BundleValidators, EventBus, NotificationService, ReceiptFactory,
};
pub use infrastructure::InMemoryRepositoryProvider;

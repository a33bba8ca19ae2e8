pub mod bundle;
pub mod events;
pub mod notifications;
pub mod ports;

// Re-export key types for convenience
pub use bundle::{BundleDisposition, BundleOrchestrator, BundleOutcome, BundleValidators, ChargeLocks};
pub use events::{create_event_bus, Event, EventBus, EventSubscriber, SharedEventBus};
pub use notifications::{start_notification_worker, Notification, NotificationService, ReceiptFactory};
pub use ports::EventPublisher;

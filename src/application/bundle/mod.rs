//! Bundle processing
//!
//! The orchestrator validates a bundle, applies accepted operations to the
//! charge timelines, persists the result and announces it.

pub mod locks;
pub mod orchestrator;
pub mod outcome;
pub mod validators;

pub use locks::{ChargeLockGuard, ChargeLocks};
pub use orchestrator::BundleOrchestrator;
pub use outcome::{BundleDisposition, BundleOutcome};
pub use validators::BundleValidators;

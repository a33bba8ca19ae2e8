//! Receipts and notifications for processed bundles

pub mod receipts;
pub mod service;

pub use receipts::{Notification, NotificationBody, ReceiptFactory, ReceiptReason};
pub use service::{start_notification_worker, NotificationService};

//! Notification service and its background worker
//!
//! Consumes bundle outcome events, builds notifications through the
//! [`ReceiptFactory`] and keeps them in a per-recipient outbox until a
//! delivery mechanism drains them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::receipts::{is_tax_tariff, Notification, ReceiptFactory};
use crate::application::events::{Event, EventSubscriber};
use crate::domain::market_participant::MarketParticipantRole;
use crate::domain::RepositoryProvider;
use crate::shared::errors::AppError;

pub struct NotificationService {
    repos: Arc<dyn RepositoryProvider>,
    factory: ReceiptFactory,
    outbox: DashMap<String, Vec<Notification>>,
}

impl NotificationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, factory: ReceiptFactory) -> Self {
        Self {
            repos,
            factory,
            outbox: DashMap::new(),
        }
    }

    /// Build and queue the notifications for one event. Returns how many were queued.
    pub async fn handle(&self, event: &Event) -> Result<usize, AppError> {
        let notifications = match event {
            Event::ChargeOperationsAccepted(e) => {
                let mut notifications = self.factory.confirmations(&e.document, &e.operations);
                if e.operations.iter().any(is_tax_tariff) {
                    let providers = self
                        .repos
                        .market_participants()
                        .find_active_by_role(MarketParticipantRole::GridAccessProvider)
                        .await?;
                    notifications.extend(self.factory.charge_data(&e.document, &e.operations, &providers));
                }
                notifications
            }
            Event::ChargeOperationsRejected(e) => self.factory.rejections(&e.document, &e.rejected),
        };

        let count = notifications.len();
        for notification in notifications {
            self.outbox
                .entry(notification.recipient.market_id.clone())
                .or_default()
                .push(notification);
        }
        debug!(
            event_type = event.event_type(),
            document_id = event.document_id(),
            queued = count,
            "Notifications queued"
        );
        Ok(count)
    }

    /// Notifications waiting for `market_id`, oldest first.
    pub fn pending_for(&self, market_id: &str) -> Vec<Notification> {
        self.outbox
            .get(market_id)
            .map(|queue| queue.clone())
            .unwrap_or_default()
    }

    /// Remove and return every notification waiting for `market_id`.
    pub fn drain_for(&self, market_id: &str) -> Vec<Notification> {
        self.outbox
            .remove(market_id)
            .map(|(_, queue)| queue)
            .unwrap_or_default()
    }

    pub fn pending_count(&self) -> usize {
        self.outbox.iter().map(|queue| queue.len()).sum()
    }

    /// Recipients with at least one pending notification, sorted.
    pub fn recipients(&self) -> Vec<String> {
        let mut recipients: Vec<_> = self
            .outbox
            .iter()
            .filter(|queue| !queue.is_empty())
            .map(|queue| queue.key().clone())
            .collect();
        recipients.sort();
        recipients
    }
}

/// Feed `service` from `subscriber` until the event bus closes.
pub fn start_notification_worker(
    service: Arc<NotificationService>,
    mut subscriber: EventSubscriber,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Notification worker started");

        let mut reported = 0;
        while let Some(message) = subscriber.recv().await {
            let missed = subscriber.missed();
            if missed > reported {
                error!(
                    lost = missed - reported,
                    total_lost = missed,
                    "Outcome events lost, no notifications were built for them"
                );
                reported = missed;
            }
            if let Err(e) = service.handle(&message.event).await {
                warn!(
                    error = %e,
                    event_id = %message.id,
                    document_id = message.event.document_id(),
                    "Failed to build notifications"
                );
            }
        }

        info!("Notification worker stopped");
    })
}

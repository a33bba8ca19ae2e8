//! Event Bus for broadcasting bundle outcomes to subscribers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::types::{ChargeOperationsAcceptedEvent, ChargeOperationsRejectedEvent, Event, EventMessage};
use crate::application::ports::EventPublisher;
use crate::domain::document::{ChargeOperation, Document};
use crate::domain::validation::RejectedOperation;
use crate::shared::errors::InfraError;
use crate::shared::telemetry::record_events_lagged;

const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for broadcasting events to all subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn publish(&self, event: Event) {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let document_id = message.event.document_id().to_string();
        let operations = message.event.operation_count();

        match self.sender.send(message) {
            Ok(count) => {
                debug!(
                    event_type,
                    document_id,
                    operations,
                    subscribers = count,
                    "Event published"
                );
            }
            Err(_) => {
                debug!(
                    event_type,
                    document_id,
                    operations,
                    "Event published (no subscribers)"
                );
            }
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        self.subscriber_count.fetch_add(1, Ordering::SeqCst);
        let count = self.subscriber_count.load(Ordering::SeqCst);
        info!(total = count, "New event subscriber");

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
            missed: 0,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish_accepted(
        &self,
        document: &Document,
        operations: &[ChargeOperation],
    ) -> Result<(), InfraError> {
        self.publish(Event::ChargeOperationsAccepted(ChargeOperationsAcceptedEvent {
            document: document.clone(),
            operations: operations.to_vec(),
            timestamp: Utc::now(),
        }));
        Ok(())
    }

    async fn publish_rejected(
        &self,
        document: &Document,
        rejected: &[RejectedOperation],
    ) -> Result<(), InfraError> {
        self.publish(Event::ChargeOperationsRejected(ChargeOperationsRejectedEvent {
            document: document.clone(),
            rejected: rejected.to_vec(),
            timestamp: Utc::now(),
        }));
        Ok(())
    }
}

/// Event subscriber that receives events from the bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
    missed: u64,
}

impl EventSubscriber {
    /// Next message, or `None` once every bus handle is dropped.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    self.missed += count;
                    record_events_lagged(count);
                    warn!(missed = count, total_missed = self.missed, "Subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return None;
                }
            }
        }
    }

    /// Events dropped because this subscriber fell behind the bus capacity.
    pub fn missed(&self) -> u64 {
        self.missed
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        let prev = self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
        info!(remaining = prev.saturating_sub(1), "Event subscriber disconnected");
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus(capacity: usize) -> SharedEventBus {
    Arc::new(EventBus::with_capacity(capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::OperationType;
    use crate::test_support::{document, operation};

    #[tokio::test]
    async fn subscribers_receive_published_outcomes() {
        let bus = EventBus::with_capacity(8);
        let mut subscriber = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let ops = vec![operation("op-1", OperationType::Create, "T-1")];
        bus.publish_accepted(&document(), &ops).await.unwrap();

        let message = subscriber.recv().await.unwrap();
        assert_eq!(message.event.event_type(), "charge_operations_accepted");
        assert_eq!(message.event.document_id(), document().id);
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_not_an_error() {
        let bus = EventBus::new();
        let rejected = vec![RejectedOperation::new(
            operation("op-1", OperationType::Create, "T-1"),
            Vec::new(),
        )];
        assert!(bus.publish_rejected(&document(), &rejected).await.is_ok());
    }

    #[tokio::test]
    async fn recv_returns_none_when_bus_dropped() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();
        drop(bus);
        assert!(subscriber.recv().await.is_none());
    }

    #[tokio::test]
    async fn lagging_subscriber_counts_missed_events() {
        let bus = EventBus::with_capacity(2);
        let mut subscriber = bus.subscribe();

        for n in 0..5 {
            let ops = vec![operation(&format!("op-{n}"), OperationType::Create, "T-1")];
            bus.publish_accepted(&document(), &ops).await.unwrap();
        }

        let message = subscriber.recv().await.unwrap();
        assert_eq!(subscriber.missed(), 3);
        assert_eq!(message.event.operation_count(), 1);
        assert!(subscriber.recv().await.is_some());
        assert_eq!(subscriber.missed(), 3);
    }

    #[test]
    fn dropping_subscriber_decrements_count() {
        let bus = EventBus::new();
        let subscriber = bus.subscribe();
        drop(subscriber);
        assert_eq!(bus.subscriber_count(), 0);
    }
}

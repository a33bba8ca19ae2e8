//! Bundle outcome events
//!
//! Published once per bundle for the accepted operations and once for the
//! rejected ones, each only when non-empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{ChargeOperation, Document};
use crate::domain::validation::RejectedOperation;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    ChargeOperationsAccepted(ChargeOperationsAcceptedEvent),
    ChargeOperationsRejected(ChargeOperationsRejectedEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ChargeOperationsAccepted(_) => "charge_operations_accepted",
            Event::ChargeOperationsRejected(_) => "charge_operations_rejected",
        }
    }

    pub fn document_id(&self) -> &str {
        match self {
            Event::ChargeOperationsAccepted(e) => &e.document.id,
            Event::ChargeOperationsRejected(e) => &e.document.id,
        }
    }

    pub fn operation_count(&self) -> usize {
        match self {
            Event::ChargeOperationsAccepted(e) => e.operations.len(),
            Event::ChargeOperationsRejected(e) => e.rejected.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeOperationsAcceptedEvent {
    pub document: Document,
    pub operations: Vec<ChargeOperation>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeOperationsRejectedEvent {
    pub document: Document,
    pub rejected: Vec<RejectedOperation>,
    pub timestamp: DateTime<Utc>,
}

/// Envelope carried on the event bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

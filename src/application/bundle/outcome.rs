//! Result of processing one bundle

use serde::{Deserialize, Serialize};

use crate::domain::document::{ChargeOperation, Document};
use crate::domain::validation::RejectedOperation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BundleDisposition {
    /// Document validation failed; no operation was evaluated.
    DocumentRejected,
    /// Operations were evaluated one by one.
    Processed,
}

impl BundleDisposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentRejected => "document_rejected",
            Self::Processed => "processed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleOutcome {
    pub document: Document,
    pub disposition: BundleDisposition,
    /// In bundle order
    pub accepted: Vec<ChargeOperation>,
    /// In bundle order
    pub rejected: Vec<RejectedOperation>,
}

impl BundleOutcome {
    pub fn is_document_rejected(&self) -> bool {
        self.disposition == BundleDisposition::DocumentRejected
    }

    pub fn accepted_ids(&self) -> Vec<&str> {
        self.accepted.iter().map(|op| op.id.as_str()).collect()
    }

    pub fn rejected_ids(&self) -> Vec<&str> {
        self.rejected.iter().map(|r| r.operation.id.as_str()).collect()
    }

    pub fn rejection_for(&self, operation_id: &str) -> Option<&RejectedOperation> {
        self.rejected.iter().find(|r| r.operation.id == operation_id)
    }
}

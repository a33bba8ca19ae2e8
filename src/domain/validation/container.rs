//! Rule failures tagged with where and why they happened

use serde::{Deserialize, Serialize};

use super::identifier::ValidationRuleIdentifier;

/// What a failure applies to: the whole document or one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationScope {
    Document,
    Operation { operation_id: String },
}

/// Why an operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// A rule evaluated against the input failed.
    Rule {
        identifier: ValidationRuleIdentifier,
        message_parameters: Vec<String>,
    },
    /// An earlier operation on the same charge in the bundle failed.
    SubsequentBundleOperationsFail { triggered_by: String },
    /// The timeline refused a mutation that validation had let through.
    TimelineInvariantViolation { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRuleContainer {
    pub scope: ValidationScope,
    pub reason: RejectionReason,
}

impl ValidationRuleContainer {
    pub fn new(
        scope: ValidationScope,
        identifier: ValidationRuleIdentifier,
        message_parameters: Vec<String>,
    ) -> Self {
        Self {
            scope,
            reason: RejectionReason::Rule {
                identifier,
                message_parameters,
            },
        }
    }

    pub fn cascaded(operation_id: impl Into<String>, triggered_by: impl Into<String>) -> Self {
        Self {
            scope: ValidationScope::Operation {
                operation_id: operation_id.into(),
            },
            reason: RejectionReason::SubsequentBundleOperationsFail {
                triggered_by: triggered_by.into(),
            },
        }
    }

    pub fn timeline_violation(operation_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            scope: ValidationScope::Operation {
                operation_id: operation_id.into(),
            },
            reason: RejectionReason::TimelineInvariantViolation {
                detail: detail.into(),
            },
        }
    }

    pub fn identifier(&self) -> ValidationRuleIdentifier {
        match &self.reason {
            RejectionReason::Rule { identifier, .. } => *identifier,
            RejectionReason::SubsequentBundleOperationsFail { .. } => {
                ValidationRuleIdentifier::SubsequentBundleOperationsFail
            }
            RejectionReason::TimelineInvariantViolation { .. } => {
                ValidationRuleIdentifier::TimelineInvariantViolation
            }
        }
    }

    pub fn message_parameters(&self) -> &[String] {
        match &self.reason {
            RejectionReason::Rule {
                message_parameters, ..
            } => message_parameters,
            _ => &[],
        }
    }

    /// Operation that caused a cascaded rejection.
    pub fn triggered_by(&self) -> Option<&str> {
        match &self.reason {
            RejectionReason::SubsequentBundleOperationsFail { triggered_by } => Some(triggered_by),
            _ => None,
        }
    }

    pub fn operation_id(&self) -> Option<&str> {
        match &self.scope {
            ValidationScope::Operation { operation_id } => Some(operation_id),
            ValidationScope::Document => None,
        }
    }

    pub fn is_document_scoped(&self) -> bool {
        self.scope == ValidationScope::Document
    }
}

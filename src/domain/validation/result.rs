//! Outcome of one validation pass

use serde::{Deserialize, Serialize};

use super::container::ValidationRuleContainer;
use crate::domain::document::ChargeOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Success,
    Failure(Vec<ValidationRuleContainer>),
}

impl ValidationResult {
    /// `Success` when `containers` is empty.
    pub fn from_containers(containers: Vec<ValidationRuleContainer>) -> Self {
        if containers.is_empty() {
            Self::Success
        } else {
            Self::Failure(containers)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_failed(&self) -> bool {
        !self.is_success()
    }

    pub fn containers(&self) -> &[ValidationRuleContainer] {
        match self {
            Self::Success => &[],
            Self::Failure(containers) => containers,
        }
    }

    pub fn into_containers(self) -> Vec<ValidationRuleContainer> {
        match self {
            Self::Success => Vec::new(),
            Self::Failure(containers) => containers,
        }
    }
}

/// An operation paired with every reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedOperation {
    pub operation: ChargeOperation,
    pub containers: Vec<ValidationRuleContainer>,
}

impl RejectedOperation {
    pub fn new(operation: ChargeOperation, containers: Vec<ValidationRuleContainer>) -> Self {
        Self {
            operation,
            containers,
        }
    }
}

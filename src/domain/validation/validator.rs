//! Ordered rule sets

use super::container::{RejectionReason, ValidationRuleContainer};
use super::context::{BusinessValidationContext, DocumentValidationContext, InputValidationContext};
use super::identifier::ValidationRuleIdentifier;
use super::result::ValidationResult;
use super::rule::{ValidationRule, ValidationTarget};
use crate::domain::document::{ChargeOperation, Document};

pub type DocumentValidator = Validator<Document, DocumentValidationContext>;
pub type InputValidator = Validator<ChargeOperation, InputValidationContext>;
pub type BusinessValidator = Validator<ChargeOperation, BusinessValidationContext>;

/// Runs every rule, in insertion order, and collects all failures.
pub struct Validator<T, C> {
    rules: Vec<Box<dyn ValidationRule<T, C>>>,
}

impl<T, C> Validator<T, C> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl ValidationRule<T, C> + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn push(&mut self, rule: Box<dyn ValidationRule<T, C>>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn identifiers(&self) -> Vec<ValidationRuleIdentifier> {
        self.rules.iter().map(|r| r.identifier()).collect()
    }
}

impl<T: ValidationTarget, C> Validator<T, C> {
    pub fn validate(&self, candidate: &T, context: &C) -> ValidationResult {
        let scope = candidate.scope();
        let containers = self
            .rules
            .iter()
            .filter(|rule| !rule.is_valid(candidate, context))
            .map(|rule| ValidationRuleContainer {
                scope: scope.clone(),
                reason: RejectionReason::Rule {
                    identifier: rule.identifier(),
                    message_parameters: rule.message_parameters(candidate, context),
                },
            })
            .collect();

        ValidationResult::from_containers(containers)
    }
}

impl<T, C> Default for Validator<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

//! Rule abstraction
//!
//! A rule is a pure predicate over one candidate (a document or an operation)
//! and a context the caller prepared beforehand. Rules never perform I/O.

use super::container::ValidationScope;
use super::identifier::ValidationRuleIdentifier;
use crate::domain::document::{ChargeOperation, Document};

pub trait ValidationRule<T, C>: Send + Sync {
    fn identifier(&self) -> ValidationRuleIdentifier;

    fn is_valid(&self, candidate: &T, context: &C) -> bool;

    /// Values substituted into the rejection message shown to the sender.
    fn message_parameters(&self, _candidate: &T, _context: &C) -> Vec<String> {
        Vec::new()
    }
}

/// Something a validator can run against.
pub trait ValidationTarget {
    fn scope(&self) -> ValidationScope;
}

impl ValidationTarget for Document {
    fn scope(&self) -> ValidationScope {
        ValidationScope::Document
    }
}

impl ValidationTarget for ChargeOperation {
    fn scope(&self) -> ValidationScope {
        ValidationScope::Operation {
            operation_id: self.id.clone(),
        }
    }
}

//! Validation rule pipeline
//!
//! Rules are pure predicates grouped into validators. A validator evaluates
//! every rule it holds and reports all failures in one [`ValidationResult`].

pub mod container;
pub mod context;
pub mod identifier;
pub mod result;
pub mod rule;
pub mod rules;
pub mod validator;

pub use container::{RejectionReason, ValidationRuleContainer, ValidationScope};
pub use context::{BusinessValidationContext, DocumentValidationContext, InputValidationContext};
pub use identifier::ValidationRuleIdentifier;
pub use result::{RejectedOperation, ValidationResult};
pub use rule::{ValidationRule, ValidationTarget};
pub use rules::{business_validator, document_validator, input_validator};
pub use validator::{BusinessValidator, DocumentValidator, InputValidator, Validator};

//! The three validators a bundle passes through

use crate::config::AppConfig;
use crate::domain::validation::{
    business_validator, document_validator, input_validator, BusinessValidator, DocumentValidator,
    InputValidator,
};

pub struct BundleValidators {
    pub document: DocumentValidator,
    pub input: InputValidator,
    pub business: BusinessValidator,
}

impl BundleValidators {
    pub fn new(document: DocumentValidator, input: InputValidator, business: BusinessValidator) -> Self {
        Self {
            document,
            input,
            business,
        }
    }

    /// Full rule catalogue with limits and market settings from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            document_validator(&config.market),
            input_validator(&config.validation, &config.market),
            business_validator(),
        )
    }
}

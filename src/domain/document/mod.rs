//! Incoming market documents

pub mod model;

pub use model::{
    BusinessReasonCode, ChargeBundle, ChargeOperation, Document, DocumentParty, DocumentType,
    OperationType,
};

//! Common types shared across the PII field encryption crates: the
//! service-facing error type and the encrypted storage records.

pub mod error;
pub mod record;

pub use error::ServiceError;
pub use record::{DemographicsRecord, DeviceRecord, EncryptedField};

//! Encrypting repositories over a pluggable storage backend.
//!
//! The backend only ever sees [`common::DeviceRecord`]s, so PII reaches it
//! already encrypted. The repositories own the [`Encryptor`](crate::Encryptor)
//! and apply the bulk-read degradation policy.

pub mod device;
pub mod memory;

pub use device::{DeviceRepository, DeviceStore};
pub use memory::MemoryDeviceStore;

use thiserror::Error;

use crate::mapper::FieldError;

/// Failures reported by a storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Failures surfaced by a repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl From<RepositoryError> for common::ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Store(StoreError::NotFound) => {
                common::ServiceError::NotFound("record not found".into())
            }
            _ => common::ServiceError::internal(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

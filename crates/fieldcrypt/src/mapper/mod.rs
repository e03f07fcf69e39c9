//! Conversion between domain objects and their encrypted storage records.
//!
//! Each present PII attribute is encrypted into its own envelope; an absent
//! attribute stays `None` in storage. Single-record conversions fail on the
//! first field that cannot be encrypted or decrypted and name that field in
//! the error. Mappers perform no I/O.

pub mod demographics;
pub mod device;

pub use demographics::{decrypt_demographics, decrypt_demographics_view, encrypt_demographics};
pub use device::{decrypt_device, encrypt_device};

use common::EncryptedField;
use thiserror::Error;

use crate::crypto::{CryptoError, Encryptor};

/// A single attribute failed to convert.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("failed to encrypt {field}")]
    Encrypt {
        field: &'static str,
        #[source]
        source: CryptoError,
    },

    #[error("failed to decrypt {field}")]
    Decrypt {
        field: &'static str,
        #[source]
        source: CryptoError,
    },
}

impl FieldError {
    /// The attribute that failed.
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Encrypt { field, .. } | FieldError::Decrypt { field, .. } => field,
        }
    }

    /// Kind of the underlying failure, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldError::Encrypt { source, .. } | FieldError::Decrypt { source, .. } => {
                source.kind()
            }
        }
    }
}

fn seal_int<E: Encryptor + ?Sized>(
    encryptor: &E,
    field: &'static str,
    value: Option<i64>,
) -> Result<Option<EncryptedField>, FieldError> {
    value
        .map(|v| {
            encryptor
                .encrypt_int(v)
                .map(EncryptedField::from)
                .map_err(|source| FieldError::Encrypt { field, source })
        })
        .transpose()
}

fn seal_str<E: Encryptor + ?Sized>(
    encryptor: &E,
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<EncryptedField>, FieldError> {
    value
        .map(|v| {
            encryptor
                .encrypt_string(v)
                .map(EncryptedField::from)
                .map_err(|source| FieldError::Encrypt { field, source })
        })
        .transpose()
}

fn open_int<E: Encryptor + ?Sized>(
    decryptor: &E,
    field: &'static str,
    value: Option<&EncryptedField>,
) -> Result<Option<i64>, FieldError> {
    value
        .map(|v| {
            decryptor
                .decrypt_int(v.as_str())
                .map_err(|source| FieldError::Decrypt { field, source })
        })
        .transpose()
}

fn open_str<E: Encryptor + ?Sized>(
    decryptor: &E,
    field: &'static str,
    value: Option<&EncryptedField>,
) -> Result<Option<String>, FieldError> {
    value
        .map(|v| {
            decryptor
                .decrypt_string(v.as_str())
                .map_err(|source| FieldError::Decrypt { field, source })
        })
        .transpose()
}

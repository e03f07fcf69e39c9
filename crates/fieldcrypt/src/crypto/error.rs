//! Error kinds produced by the cipher layer.

use common::ServiceError;
use thiserror::Error;

/// Result alias for cipher-layer operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors produced by the cipher layer.
///
/// Messages never include key material, plaintext, or ciphertext bytes.
/// None of these kinds are transient, so callers must not retry them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The version tag is not in the known set, or is known but not handled
    /// by the engine asked to decrypt it.
    #[error("unsupported encryption version: {0}")]
    UnsupportedVersion(String),

    /// The envelope is not three dot-separated parts with valid base64.
    #[error("invalid ciphertext format")]
    InvalidFormat,

    /// The key is not 16, 24 or 32 bytes.
    #[error("invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    /// The cipher or the random source failed while encrypting.
    #[error("encryption failed: {0}")]
    Encryption(&'static str),

    /// Authentication, padding, or decoding failure while decrypting.
    #[error("decryption failed: {0}")]
    Decryption(&'static str),

    /// A decrypted integer payload was not exactly 8 bytes.
    #[error("invalid integer payload: {0} bytes (expected 8)")]
    InvalidInteger(usize),
}

impl CryptoError {
    /// Short, stable name of the error kind, safe to use as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CryptoError::UnsupportedVersion(_) => "unsupported_version",
            CryptoError::InvalidFormat => "invalid_format",
            CryptoError::InvalidKeyLength(_) => "invalid_key_length",
            CryptoError::Encryption(_) => "encryption",
            CryptoError::Decryption(_) => "decryption",
            CryptoError::InvalidInteger(_) => "invalid_integer",
        }
    }
}

impl From<CryptoError> for ServiceError {
    fn from(_: CryptoError) -> Self {
        ServiceError::internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_hides_reason() {
        let err: ServiceError = CryptoError::Decryption("authentication failed").into();
        assert_eq!(err.http_status(), 500);
        assert!(!err.to_string().contains("authentication"));
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            CryptoError::UnsupportedVersion("v9".into()).kind(),
            CryptoError::InvalidFormat.kind(),
            CryptoError::InvalidKeyLength(3).kind(),
            CryptoError::Encryption("x").kind(),
            CryptoError::Decryption("x").kind(),
            CryptoError::InvalidInteger(7).kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }
}

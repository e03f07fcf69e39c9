//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Internal`] → 500
///
/// Crypto-layer failures always become [`ServiceError::Internal`] with a
/// generic message. The reason a ciphertext was rejected is never echoed back
/// to an external caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// The generic internal error used for every encryption/decryption failure.
    pub fn internal() -> Self {
        ServiceError::Internal("internal error".into())
    }

    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::NotFound("x".into()).http_status(), 404);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
        assert_eq!(ServiceError::internal().http_status(), 500);
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::NotFound("device".into());
        assert!(e.to_string().contains("device"));
    }
}

//! Fixed-width integer encoding: signed 64-bit values as 8 big-endian bytes.

use super::error::{CryptoError, Result};

/// Encoded width of an integer payload.
pub const INT_LEN: usize = 8;

/// Two's-complement big-endian encoding of `value`.
pub fn encode(value: i64) -> [u8; INT_LEN] {
    value.to_be_bytes()
}

/// Decode an integer payload.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInteger`] unless `bytes` is exactly
/// [`INT_LEN`] bytes.
pub fn decode(bytes: &[u8]) -> Result<i64> {
    let buf: [u8; INT_LEN] = bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidInteger(bytes.len()))?;
    Ok(i64::from_be_bytes(buf))
}

//! [`SecretKey`]: owned AES key material for the cipher engines.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{CryptoError, Result};

/// Key lengths accepted by both engines (AES-128, AES-192, AES-256).
pub const AES_KEY_LENS: [usize; 3] = [16, 24, 32];

/// AES key bytes supplied from configuration.
///
/// The subsystem never generates or persists keys. When this type is dropped
/// the memory is zeroized.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Box<[u8]>);

impl SecretKey {
    /// Copy `bytes` into a new key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] unless `bytes` is 16, 24 or
    /// 32 bytes long.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        if !AES_KEY_LENS.contains(&bytes.len()) {
            return Err(CryptoError::InvalidKeyLength(bytes.len()));
        }
        Ok(Self(bytes.to_vec().into_boxed_slice()))
    }

    /// Length of the key in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: an empty key cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        write!(f, "SecretKey([REDACTED; {}])", self.0.len())
    }
}

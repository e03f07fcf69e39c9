//! Field encryption primitives.
//!
//! This module is free of storage and domain dependencies. It provides the
//! [`Encryptor`] capability, the two engines implementing it, and the
//! dispatcher that picks an engine from configuration or from an existing
//! envelope.
//!
//! # Ciphertext format
//!
//! ```text
//! v1.<base64(ciphertext+tag)>.<base64(nonce)>
//! ```
//!
//! See [`envelope`] for the codec. The version prefix lets already persisted
//! rows keep decrypting after the write path moves to a new scheme.

pub mod aead;
pub mod envelope;
pub mod error;
pub mod factory;
pub mod integer;
pub mod legacy;

pub use aead::AeadEngine;
pub use envelope::{Envelope, Version};
pub use error::{CryptoError, Result};
pub use factory::{encryptor_for_ciphertext, new_encryptor, VersionedEncryptor};
pub use legacy::LegacyEngine;

use aes_gcm::aead::{rand_core::RngCore, OsRng};

/// Encrypt and decrypt bytes, strings and signed 64-bit integers to and from
/// envelope strings.
///
/// Implementations hold only an immutable key, so one instance can be shared
/// across threads without locking. Every encryption draws a fresh nonce or IV,
/// so encrypting the same value twice yields different envelopes.
pub trait Encryptor: Send + Sync {
    /// Encrypt raw bytes into an envelope.
    fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String>;

    /// Decrypt an envelope back to raw bytes.
    fn decrypt_bytes(&self, envelope: &str) -> Result<Vec<u8>>;

    fn encrypt_string(&self, value: &str) -> Result<String> {
        self.encrypt_bytes(value.as_bytes())
    }

    /// Decrypt an envelope holding UTF-8 text.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`Encryptor::decrypt_bytes`], returns
    /// [`CryptoError::Decryption`] if the plaintext is not valid UTF-8.
    fn decrypt_string(&self, envelope: &str) -> Result<String> {
        let plaintext = self.decrypt_bytes(envelope)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Decryption("plaintext is not UTF-8"))
    }

    fn encrypt_int(&self, value: i64) -> Result<String> {
        self.encrypt_bytes(&integer::encode(value))
    }

    /// Decrypt an envelope holding an 8-byte big-endian integer.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`Encryptor::decrypt_bytes`], returns
    /// [`CryptoError::InvalidInteger`] if the plaintext is not 8 bytes.
    fn decrypt_int(&self, envelope: &str) -> Result<i64> {
        integer::decode(&self.decrypt_bytes(envelope)?)
    }
}

impl<T: Encryptor + ?Sized> Encryptor for std::sync::Arc<T> {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String> {
        (**self).encrypt_bytes(plaintext)
    }

    fn decrypt_bytes(&self, envelope: &str) -> Result<Vec<u8>> {
        (**self).decrypt_bytes(envelope)
    }
}

/// Fill `buf` from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`CryptoError::Encryption`] if the random source is unavailable.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|_| CryptoError::Encryption("random source unavailable"))
}

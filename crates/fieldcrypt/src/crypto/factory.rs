//! Engine selection by version tag.
//!
//! [`VersionedEncryptor`] holds one variant per engine, each carrying its own
//! key, and dispatches by `match`. Build it once at startup with
//! [`new_encryptor`] and hand it (or an `Arc` of it) to every consumer.

use tracing::debug;

use super::aead::AeadEngine;
use super::envelope::{RawEnvelope, Version};
use super::error::{CryptoError, Result};
use super::legacy::{self, LegacyEngine};
use super::Encryptor;
use crate::config::CryptoConfig;

/// An engine chosen by version tag.
#[derive(Debug, Clone)]
pub enum VersionedEncryptor {
    /// AES-GCM, the current scheme.
    Aead(AeadEngine),
    /// Deprecated AES-CBC, for reading and migrating old rows.
    Legacy(LegacyEngine),
}

impl VersionedEncryptor {
    /// The tag this engine writes.
    pub fn version(&self) -> Version {
        match self {
            VersionedEncryptor::Aead(e) => e.version(),
            VersionedEncryptor::Legacy(e) => e.version(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, VersionedEncryptor::Legacy(_))
    }
}

impl Encryptor for VersionedEncryptor {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String> {
        match self {
            VersionedEncryptor::Aead(e) => e.encrypt_bytes(plaintext),
            VersionedEncryptor::Legacy(e) => e.encrypt_bytes(plaintext),
        }
    }

    fn decrypt_bytes(&self, envelope: &str) -> Result<Vec<u8>> {
        match self {
            VersionedEncryptor::Aead(e) => e.decrypt_bytes(envelope),
            VersionedEncryptor::Legacy(e) => e.decrypt_bytes(envelope),
        }
    }
}

impl From<AeadEngine> for VersionedEncryptor {
    fn from(engine: AeadEngine) -> Self {
        VersionedEncryptor::Aead(engine)
    }
}

impl From<LegacyEngine> for VersionedEncryptor {
    fn from(engine: LegacyEngine) -> Self {
        VersionedEncryptor::Legacy(engine)
    }
}

/// Build the engine named by `config.encryption_version`.
///
/// Only `v1` (AES-GCM) is reachable from configuration. The legacy engine
/// must be constructed explicitly.
///
/// # Errors
///
/// Returns [`CryptoError::UnsupportedVersion`] for any other identifier and
/// [`CryptoError::InvalidKeyLength`] for a bad secret.
pub fn new_encryptor(config: &CryptoConfig) -> Result<VersionedEncryptor> {
    match config.encryption_version.parse::<Version>()? {
        Version::V1 => Ok(AeadEngine::new(config.secret_bytes())?.into()),
        other => Err(CryptoError::UnsupportedVersion(other.to_string())),
    }
}

/// Build the engine able to decrypt `envelope`, bound to `key`.
///
/// Only the version part (and, for `v1`, the salt-material length) is
/// inspected; the payload is not validated here.
///
/// - `v0` selects the legacy engine; the AES-GCM engine never writes it.
/// - `v1` is shared by both schemes. A 16-byte IV selects the legacy engine,
///   anything else the AES-GCM engine (whose nonce is 12 bytes).
///
/// # Errors
///
/// Returns [`CryptoError::InvalidFormat`] unless `envelope` has three
/// dot-separated parts, [`CryptoError::UnsupportedVersion`] for an unknown
/// tag, and [`CryptoError::InvalidKeyLength`] for a bad key.
pub fn encryptor_for_ciphertext(envelope: &str, key: &[u8]) -> Result<VersionedEncryptor> {
    let raw = RawEnvelope::split(envelope)?;
    let encryptor: VersionedEncryptor = match raw.version()? {
        Version::V0 => LegacyEngine::with_version(key, Version::V0)?.into(),
        Version::V1 if raw.salt_len() == Some(legacy::BLOCK_LEN) => LegacyEngine::new(key)?.into(),
        Version::V1 => AeadEngine::new(key)?.into(),
    };
    debug!(
        version = %raw.version,
        legacy = encryptor.is_legacy(),
        "resolved encryptor for ciphertext"
    );
    Ok(encryptor)
}

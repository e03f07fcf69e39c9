//! AES-GCM engine: the current scheme for all new writes.
//!
//! Each call seals the plaintext under a fresh random 96-bit nonce with no
//! associated data. The 16-byte authentication tag is appended to the
//! ciphertext by the seal operation, so a tampered or wrong-key envelope fails
//! to open and no partial plaintext is ever returned.

use std::fmt;

use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};

use super::envelope::{self, RawEnvelope, Version};
use super::error::{CryptoError, Result};
use super::{fill_random, Encryptor};
use crate::key::SecretKey;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// AES-GCM keyed with a 128, 192 or 256-bit key.
#[derive(Clone)]
enum GcmCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl GcmCipher {
    fn new(key: &SecretKey) -> Result<Self> {
        let bytes = key.expose();
        let cipher = match bytes.len() {
            16 => Aes128Gcm::new_from_slice(bytes).map(Self::Aes128),
            24 => Aes192Gcm::new_from_slice(bytes).map(Self::Aes192),
            32 => Aes256Gcm::new_from_slice(bytes).map(Self::Aes256),
            n => return Err(CryptoError::InvalidKeyLength(n)),
        };
        cipher.map_err(|_| CryptoError::InvalidKeyLength(bytes.len()))
    }

    fn seal(&self, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Option<Vec<u8>> {
        let nonce = Nonce::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        }
        .ok()
    }

    fn open(&self, nonce: &[u8], ciphertext: &[u8]) -> Option<Vec<u8>> {
        let nonce = Nonce::from_slice(nonce);
        match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
        .ok()
    }
}

/// The authenticated engine. Writes and reads envelopes tagged `v1`.
///
/// The key schedule is expanded once at construction; the raw key bytes are
/// not retained.
#[derive(Clone)]
pub struct AeadEngine {
    cipher: GcmCipher,
    version: Version,
}

impl AeadEngine {
    /// Tags this engine may write. Disjoint from the tags that
    /// [`encryptor_for_ciphertext`](super::encryptor_for_ciphertext) routes to
    /// the legacy engine, so every envelope it writes can be resolved back.
    pub const VERSIONS: [Version; 1] = [Version::V1];

    /// Build an engine tagging envelopes with `v1`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] unless `key` is 16, 24 or 32
    /// bytes. A misconfigured key is a deployment error, so callers should
    /// treat this as fatal at startup.
    pub fn new(key: &[u8]) -> Result<Self> {
        Self::with_version(key, Version::V1)
    }

    /// Build an engine that writes and accepts `version` as its tag.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedVersion`] for a tag outside
    /// [`AeadEngine::VERSIONS`], plus the errors of [`AeadEngine::new`].
    pub fn with_version(key: &[u8], version: Version) -> Result<Self> {
        Self::from_key(SecretKey::new(key)?, version)
    }

    /// As [`AeadEngine::with_version`], from an already validated key.
    pub fn from_key(key: SecretKey, version: Version) -> Result<Self> {
        if !Self::VERSIONS.contains(&version) {
            return Err(CryptoError::UnsupportedVersion(version.to_string()));
        }
        Ok(Self {
            cipher: GcmCipher::new(&key)?,
            version,
        })
    }

    pub fn version(&self) -> Version {
        self.version
    }
}

impl fmt::Debug for AeadEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AeadEngine")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Encryptor for AeadEngine {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String> {
        let mut nonce = [0u8; NONCE_LEN];
        fill_random(&mut nonce)?;

        let ciphertext = self
            .cipher
            .seal(&nonce, plaintext)
            .ok_or(CryptoError::Encryption("aead seal failed"))?;

        Ok(envelope::format(self.version, &ciphertext, &nonce))
    }

    fn decrypt_bytes(&self, envelope: &str) -> Result<Vec<u8>> {
        let raw = RawEnvelope::split(envelope)?;
        if raw.version()? != self.version {
            return Err(CryptoError::UnsupportedVersion(raw.version.to_owned()));
        }

        let (ciphertext, nonce) = raw
            .decode()
            .map_err(|_| CryptoError::Decryption("base64 decoding failed"))?;
        if nonce.len() != NONCE_LEN {
            return Err(CryptoError::Decryption("invalid nonce length"));
        }

        self.cipher
            .open(&nonce, &ciphertext)
            .ok_or(CryptoError::Decryption("authentication failed"))
    }
}

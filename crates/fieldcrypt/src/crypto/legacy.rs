//! Deprecated AES-CBC engine, retained to read and migrate old rows.
//!
//! Plaintext is PKCS#7 padded to the AES block size and encrypted in CBC mode
//! under a random 16-byte IV. There is no integrity protection; new data must
//! be written with [`AeadEngine`](super::AeadEngine).

use aes::cipher::{
    block_padding::Pkcs7, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
};
use aes::{Aes128, Aes192, Aes256};
use zeroize::Zeroize;

use super::envelope::{self, RawEnvelope, Version};
use super::error::{CryptoError, Result};
use super::{fill_random, Encryptor};
use crate::key::SecretKey;

/// AES block size; also the IV length.
pub const BLOCK_LEN: usize = 16;

/// Deprecated: use [`AeadEngine`](super::AeadEngine) for new data.
#[derive(Debug, Clone)]
pub struct LegacyEngine {
    key: SecretKey,
    version: Version,
}

impl LegacyEngine {
    /// Tags this engine may write, and the tags it reads. Old rows carry `v1`.
    pub const VERSIONS: [Version; 2] = [Version::V1, Version::V0];

    /// Build an engine that tags envelopes with `v1`, byte-compatible with
    /// rows already written by this scheme.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] unless `key` is 16, 24 or 32
    /// bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        Self::with_version(key, Version::V1)
    }

    /// Build an engine that tags new envelopes with `version`.
    /// [`Version::V0`] gives legacy output an unambiguous tag.
    pub fn with_version(key: &[u8], version: Version) -> Result<Self> {
        Ok(Self::from_key(SecretKey::new(key)?, version))
    }

    pub fn from_key(key: SecretKey, version: Version) -> Self {
        Self { key, version }
    }

    pub fn version(&self) -> Version {
        self.version
    }
}

impl Encryptor for LegacyEngine {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String> {
        let mut iv = [0u8; BLOCK_LEN];
        fill_random(&mut iv)?;

        // PKCS#7 always adds between 1 and BLOCK_LEN bytes.
        let padded_len = (plaintext.len() / BLOCK_LEN + 1) * BLOCK_LEN;
        let mut buf = vec![0u8; padded_len];
        buf[..plaintext.len()].copy_from_slice(plaintext);

        let key = self.key.expose();
        let sealed = match key.len() {
            16 => cbc_encrypt::<Aes128>(key, &iv, &mut buf, plaintext.len()),
            24 => cbc_encrypt::<Aes192>(key, &iv, &mut buf, plaintext.len()),
            32 => cbc_encrypt::<Aes256>(key, &iv, &mut buf, plaintext.len()),
            n => Err(CryptoError::InvalidKeyLength(n)),
        };
        if let Err(e) = sealed {
            buf.zeroize();
            return Err(e);
        }

        Ok(envelope::format(self.version, &buf, &iv))
    }

    fn decrypt_bytes(&self, envelope: &str) -> Result<Vec<u8>> {
        let raw = RawEnvelope::split(envelope)?;
        if !Self::VERSIONS.contains(&raw.version()?) {
            return Err(CryptoError::UnsupportedVersion(raw.version.to_owned()));
        }

        let (mut buf, iv) = raw
            .decode()
            .map_err(|_| CryptoError::Decryption("base64 decoding failed"))?;
        if iv.len() != BLOCK_LEN {
            return Err(CryptoError::Decryption("invalid IV length"));
        }
        if buf.is_empty() || buf.len() % BLOCK_LEN != 0 {
            return Err(CryptoError::Decryption("ciphertext is not block aligned"));
        }

        let key = self.key.expose();
        let opened = match key.len() {
            16 => cbc_decrypt::<Aes128>(key, &iv, &mut buf),
            24 => cbc_decrypt::<Aes192>(key, &iv, &mut buf),
            32 => cbc_decrypt::<Aes256>(key, &iv, &mut buf),
            n => Err(CryptoError::InvalidKeyLength(n)),
        };

        match opened {
            Ok(len) => {
                buf[len..].zeroize();
                buf.truncate(len);
                Ok(buf)
            }
            Err(e) => {
                buf.zeroize();
                Err(e)
            }
        }
    }
}

/// Pad the first `msg_len` bytes of `buf` and encrypt the whole buffer in place.
fn cbc_encrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8], msg_len: usize) -> Result<()>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CryptoError::Encryption("invalid key or IV length"))?
        .encrypt_padded_mut::<Pkcs7>(buf, msg_len)
        .map_err(|_| CryptoError::Encryption("padding buffer too small"))?;
    Ok(())
}

/// Decrypt `buf` in place and return the unpadded length.
///
/// The padding length must lie in `1..=BLOCK_LEN` and every padding byte must
/// equal it; anything else is reported as invalid padding.
fn cbc_decrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<usize>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CryptoError::Decryption("invalid key or IV length"))?
        .decrypt_padded_mut::<Pkcs7>(buf)
        .map(<[u8]>::len)
        .map_err(|_| CryptoError::Decryption("invalid padding"))
}

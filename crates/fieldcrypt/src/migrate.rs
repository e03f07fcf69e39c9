//! Re-encryption of stored envelopes under a new engine or key.

use tracing::instrument;
use zeroize::Zeroizing;

use crate::crypto::{encryptor_for_ciphertext, Encryptor, Result};

/// Decrypt `envelope` with `source` and encrypt the plaintext with `target`.
///
/// The intermediate plaintext is zeroized when it goes out of scope, on
/// success and on failure alike.
///
/// # Errors
///
/// Any decryption error from `source` or encryption error from `target`.
pub fn reencrypt<S, T>(source: &S, target: &T, envelope: &str) -> Result<String>
where
    S: Encryptor + ?Sized,
    T: Encryptor + ?Sized,
{
    let plaintext = Zeroizing::new(source.decrypt_bytes(envelope)?);
    target.encrypt_bytes(&plaintext)
}

/// Like [`reencrypt`], picking the source engine from the envelope itself.
///
/// # Errors
///
/// As [`encryptor_for_ciphertext`] and [`reencrypt`].
#[instrument(skip_all)]
pub fn reencrypt_detected<T>(source_key: &[u8], target: &T, envelope: &str) -> Result<String>
where
    T: Encryptor + ?Sized,
{
    let source = encryptor_for_ciphertext(envelope, source_key)?;
    reencrypt(&source, target, envelope)
}

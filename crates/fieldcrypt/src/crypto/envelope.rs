//! The textual ciphertext envelope shared by every engine.
//!
//! ```text
//! <version>.<base64(ciphertext)>.<base64(nonce or IV)>
//! ```
//!
//! Base64 is the standard alphabet with padding. This layout is persisted in
//! text columns and must stay bit-exact.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::error::{CryptoError, Result};

/// Separator between the three envelope parts.
pub const SEPARATOR: char = '.';

/// Version tags recognised in the first envelope part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// Distinct tag for envelopes written by the legacy AES-CBC engine.
    V0,
    /// Written by the AES-GCM engine, and by the legacy engine in its default
    /// configuration.
    V1,
}

impl Version {
    /// The version new configurations resolve to.
    pub const CURRENT: Version = Version::V1;

    pub fn as_str(self) -> &'static str {
        match self {
            Version::V0 => "v0",
            Version::V1 => "v1",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "v0" => Ok(Version::V0),
            "v1" => Ok(Version::V1),
            other => Err(CryptoError::UnsupportedVersion(other.to_owned())),
        }
    }
}

/// The three undecoded parts of an envelope, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEnvelope<'a> {
    pub version: &'a str,
    pub payload: &'a str,
    pub salt: &'a str,
}

impl<'a> RawEnvelope<'a> {
    /// Split `envelope` into its three parts without decoding them.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidFormat`] unless there are exactly three
    /// dot-separated parts.
    pub fn split(envelope: &'a str) -> Result<Self> {
        let mut parts = envelope.split(SEPARATOR);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(version), Some(payload), Some(salt), None) => Ok(Self {
                version,
                payload,
                salt,
            }),
            _ => Err(CryptoError::InvalidFormat),
        }
    }

    /// Parse the version tag.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedVersion`] for an unknown tag.
    pub fn version(&self) -> Result<Version> {
        self.version.parse()
    }

    /// Decode the payload and salt-material parts.
    pub fn decode(&self) -> std::result::Result<(Vec<u8>, Vec<u8>), base64::DecodeError> {
        Ok((STANDARD.decode(self.payload)?, STANDARD.decode(self.salt)?))
    }

    /// Decoded length of the salt-material part, or `None` if it is not base64.
    pub fn salt_len(&self) -> Option<usize> {
        STANDARD.decode(self.salt).ok().map(|salt| salt.len())
    }
}

/// A fully decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// The version tag, not validated against the known set.
    pub version: String,
    /// Ciphertext bytes (including the tag for AEAD envelopes).
    pub ciphertext: Vec<u8>,
    /// Nonce (AEAD) or IV (legacy CBC).
    pub salt: Vec<u8>,
}

/// Encode the binary parts and join all three with [`SEPARATOR`].
pub fn format(version: Version, ciphertext: &[u8], salt: &[u8]) -> String {
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}{}",
        version,
        STANDARD.encode(ciphertext),
        STANDARD.encode(salt),
    )
}

/// Split and decode an envelope. The version value is not checked here.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidFormat`] unless there are exactly three parts
/// and both binary parts are valid base64.
pub fn parse(envelope: &str) -> Result<Envelope> {
    let raw = RawEnvelope::split(envelope)?;
    let (ciphertext, salt) = raw.decode().map_err(|_| CryptoError::InvalidFormat)?;
    Ok(Envelope {
        version: raw.version.to_owned(),
        ciphertext,
        salt,
    })
}

impl FromStr for Envelope {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.version,
            STANDARD.encode(&self.ciphertext),
            STANDARD.encode(&self.salt),
        )
    }
}

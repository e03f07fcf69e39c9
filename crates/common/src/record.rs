//! Storage-side representations of the PII-bearing entities.
//!
//! These are the shapes handed to and received from the storage layer. Every
//! PII attribute is held as an [`EncryptedField`]; plaintext never appears in a
//! record. Non-sensitive metadata (ids, platform, flags, timestamps) is passed
//! through unencrypted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Encrypted field
// ---------------------------------------------------------------------------

/// A persisted ciphertext envelope: `<version>.<base64 ciphertext>.<base64 nonce>`.
///
/// Nullable columns are modelled as `Option<EncryptedField>` so that "no value"
/// stays distinguishable from an encrypted empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedField(String);

impl EncryptedField {
    /// Wrap an envelope string produced by an encryptor.
    pub fn new(envelope: impl Into<String>) -> Self {
        Self(envelope.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for EncryptedField {
    fn from(envelope: String) -> Self {
        Self(envelope)
    }
}

impl AsRef<str> for EncryptedField {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Demographics
// ---------------------------------------------------------------------------

/// Row shape of the `user_demographics` table.
///
/// Integer-valued attributes (year of birth, gender, occupation, household
/// size) are encrypted as 8-byte big-endian integers; city and prefecture are
/// encrypted as UTF-8 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicsRecord {
    pub user_demographics_id: Uuid,
    pub user_id: Uuid,
    pub year_of_birth: Option<EncryptedField>,
    pub gender: Option<EncryptedField>,
    pub city: Option<EncryptedField>,
    pub prefecture: Option<EncryptedField>,
    pub occupation: Option<EncryptedField>,
    pub household_size: Option<EncryptedField>,
}

impl DemographicsRecord {
    /// Number of attributes that currently hold an envelope.
    pub fn populated_fields(&self) -> usize {
        [
            &self.year_of_birth,
            &self.gender,
            &self.city,
            &self.prefecture,
            &self.occupation,
            &self.household_size,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

/// Row shape of the `devices` table. Only `device_token` is encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: Uuid,
    pub user_id: Uuid,
    pub device_token: EncryptedField,
    pub platform: String,
    pub enabled: bool,
    pub device_name: Option<String>,
    pub app_version: Option<String>,
    pub os_version: Option<String>,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

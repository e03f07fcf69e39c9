//! Push-notification devices. Only the token is PII.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Push delivery platform.
///
/// Stored as plaintext metadata. A value written by another producer that is
/// not one of the known platforms is kept verbatim in [`Platform::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Apns,
    Gcm,
    Web,
    Other(String),
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Apns => "APNS",
            Platform::Gcm => "GCM",
            Platform::Web => "web",
            Platform::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Platform::Other(_))
    }
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        match s {
            "APNS" => Platform::Apns,
            "GCM" => Platform::Gcm,
            "web" => Platform::Web,
            other => Platform::Other(other.to_owned()),
        }
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Self {
        match Platform::from(s.as_str()) {
            Platform::Other(_) => Platform::Other(s),
            known => known,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered device.
#[derive(Clone, PartialEq, Eq)]
pub struct Device {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub platform: Platform,
    pub device_name: Option<String>,
    pub app_version: Option<String>,
    pub os_version: Option<String>,
    pub enabled: bool,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// Register a new, enabled device.
    pub fn new(user_id: Uuid, token: impl Into<String>, platform: Platform) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token: token.into(),
            platform,
            device_name: None,
            app_version: None,
            os_version: None,
            enabled: true,
            last_active_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.updated_at = Utc::now();
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.updated_at = Utc::now();
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .field("platform", &self.platform)
            .field("enabled", &self.enabled)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

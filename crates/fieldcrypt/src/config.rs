//! Encryption configuration loaded from the environment.
//!
//! Two variables are consumed: `ENCRYPTION_VERSION` (default `v1`) and
//! `ENCRYPTION_SECRET` (required). The secret's UTF-8 bytes are the raw key,
//! so it must be 16, 24 or 32 bytes long for the current engine.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated encryption configuration.
#[derive(Clone, Deserialize)]
pub struct CryptoConfig {
    /// Version identifier selecting the engine for new writes.
    #[serde(default = "default_encryption_version")]
    pub encryption_version: String,

    /// Raw key material. **Required.**
    pub encryption_secret: String,
}

fn default_encryption_version() -> String {
    "v1".into()
}

impl CryptoConfig {
    pub fn new(encryption_version: impl Into<String>, encryption_secret: impl Into<String>) -> Self {
        Self {
            encryption_version: encryption_version.into(),
            encryption_secret: encryption_secret.into(),
        }
    }

    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_SECRET` is absent or either value is
    /// empty. Key length is checked when the engine is built.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build encryption configuration from environment")?;

        let c: CryptoConfig = cfg
            .try_deserialize()
            .context("failed to deserialise encryption configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The key bytes handed to the engine.
    pub fn secret_bytes(&self) -> &[u8] {
        self.encryption_secret.as_bytes()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.encryption_version.trim().is_empty() {
            anyhow::bail!("ENCRYPTION_VERSION must not be empty");
        }
        if self.encryption_secret.is_empty() {
            anyhow::bail!("ENCRYPTION_SECRET is required and must not be empty");
        }
        Ok(())
    }
}

impl std::fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoConfig")
            .field("encryption_version", &self.encryption_version)
            .field("encryption_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_encryption_version(), "v1");
    }

    #[test]
    fn validate_rejects_empty_secret() {
        let cfg = CryptoConfig::new("v1", "");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_version() {
        let cfg = CryptoConfig::new("  ", "0123456789abcdef");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_valid_config() {
        let cfg = CryptoConfig::new("v1", "0123456789abcdef");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.secret_bytes().len(), 16);
    }

    #[test]
    fn debug_hides_secret() {
        let cfg = CryptoConfig::new("v1", "0123456789abcdef");
        let printed = format!("{cfg:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("0123"));
    }
}

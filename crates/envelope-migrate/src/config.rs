//! Configuration loading and validation for the migration tool.

use anyhow::{Context, Result};
use fieldcrypt::CryptoConfig;
use serde::Deserialize;

/// Validated envelope-migrate configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Engine used for the rewritten envelopes.
    #[serde(default = "default_encryption_version")]
    pub encryption_version: String,

    /// Key for the rewritten envelopes. **Required.**
    pub encryption_secret: String,

    /// Key the input was written with. Defaults to `encryption_secret`.
    #[serde(default)]
    pub source_encryption_secret: Option<String>,

    /// Echo undecryptable lines unchanged instead of aborting.
    #[serde(default)]
    pub skip_undecryptable: bool,

    /// Tracing log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP gRPC endpoint; span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_encryption_version() -> String {
    "v1".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build envelope-migrate configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise envelope-migrate configuration")?;

        c.validate()?;
        Ok(c)
    }

    pub fn target_crypto(&self) -> CryptoConfig {
        CryptoConfig::new(&self.encryption_version, &self.encryption_secret)
    }

    pub fn source_secret(&self) -> &[u8] {
        self.source_encryption_secret
            .as_deref()
            .unwrap_or(&self.encryption_secret)
            .as_bytes()
    }

    fn validate(&self) -> Result<()> {
        if self.encryption_secret.is_empty() {
            anyhow::bail!("ENCRYPTION_SECRET is required and must not be empty");
        }
        if self
            .source_encryption_secret
            .as_deref()
            .is_some_and(str::is_empty)
        {
            anyhow::bail!("SOURCE_ENCRYPTION_SECRET must not be empty when set");
        }
        if self
            .otel_exporter_otlp_endpoint
            .as_deref()
            .is_some_and(|e| e.trim().is_empty())
        {
            anyhow::bail!("OTEL_EXPORTER_OTLP_ENDPOINT must not be empty when set");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("encryption_version", &self.encryption_version)
            .field("skip_undecryptable", &self.skip_undecryptable)
            .field("log_level", &self.log_level)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            encryption_version: "v1".into(),
            encryption_secret: "0123456789abcdef".into(),
            source_encryption_secret: None,
            skip_undecryptable: false,
            log_level: "info".into(),
            otel_exporter_otlp_endpoint: None,
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(default_encryption_version(), "v1");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_secret() {
        let cfg = Config {
            encryption_secret: String::new(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_source_secret() {
        let cfg = Config {
            source_encryption_secret: Some(String::new()),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_endpoint() {
        let cfg = Config {
            otel_exporter_otlp_endpoint: Some(" ".into()),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn source_secret_falls_back_to_target() {
        let mut cfg = valid();
        assert_eq!(cfg.source_secret(), b"0123456789abcdef");
        cfg.source_encryption_secret = Some("fedcba9876543210".into());
        assert_eq!(cfg.source_secret(), b"fedcba9876543210");
    }

    #[test]
    fn debug_hides_secrets() {
        let cfg = Config {
            source_encryption_secret: Some("another-secret!!".into()),
            ..valid()
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("0123456789abcdef"));
        assert!(!dbg.contains("another-secret"));
    }
}

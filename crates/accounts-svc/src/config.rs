//! Configuration loading and validation for the accounts service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::DataKey;

/// Validated accounts service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// S3 bucket holding the accounts document. **Required.**
    pub bucket: String,

    /// S3 object key of the accounts document. **Required.**
    pub keyfile: String,

    /// AWS region. When set, IVs are generated by KMS in this region;
    /// otherwise the local CSPRNG is used and S3 resolves its region from
    /// the default provider chain.
    #[serde(default)]
    pub aws_region: Option<String>,

    /// Base64-encoded 32-byte AES key used to encrypt API passwords.
    /// Without it the service starts, but create and update are refused.
    #[serde(default)]
    pub data_key: Option<String>,

    /// Override for the S3 endpoint (e.g. a local S3-compatible server).
    #[serde(default)]
    pub s3_endpoint_url: Option<String>,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix for every account route.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Filesystem path of the OpenAPI document served under `{base}/swagger`.
    #[serde(default = "default_api_docs_path")]
    pub api_docs_path: String,

    /// OTLP endpoint for span export. Spans are only exported when set.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    3000
}
fn default_base_path() -> String {
    "/identrust".into()
}
fn default_api_docs_path() -> String {
    "swagger/swagger.json".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the configured data key, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATA_KEY` is set but is not a valid base64-encoded
    /// 32-byte key.
    pub fn data_key(&self) -> Result<Option<DataKey>> {
        non_empty(&self.data_key)
            .map(|encoded| DataKey::from_base64(encoded).context("DATA_KEY is invalid"))
            .transpose()
    }

    /// AWS region, treating an empty value as unset.
    pub fn aws_region(&self) -> Option<&str> {
        non_empty(&self.aws_region)
    }

    pub fn s3_endpoint_url(&self) -> Option<&str> {
        non_empty(&self.s3_endpoint_url)
    }

    pub fn otlp_endpoint(&self) -> Option<&str> {
        non_empty(&self.otel_exporter_otlp_endpoint)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.bucket, "BUCKET")?;
        ensure_non_empty(&self.keyfile, "KEYFILE")?;

        if !self.base_path.is_empty()
            && (!self.base_path.starts_with('/') || self.base_path.ends_with('/'))
        {
            anyhow::bail!("BASE_PATH must start with '/' and must not end with '/'");
        }
        if self.port == 0 {
            anyhow::bail!("PORT must be > 0");
        }

        self.data_key()?;
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bucket", &self.bucket)
            .field("keyfile", &self.keyfile)
            .field("aws_region", &self.aws_region)
            .field("data_key", &self.data_key.as_ref().map(|_| "[REDACTED]"))
            .field("s3_endpoint_url", &self.s3_endpoint_url)
            .field("port", &self.port)
            .field("base_path", &self.base_path)
            .field("api_docs_path", &self.api_docs_path)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Base64 of 32 bytes of `0x42`.
    pub(crate) const TEST_DATA_KEY: &str = "QkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkJCQkI=";

    pub(crate) fn test_config() -> Config {
        Config {
            bucket: "test-bucket".into(),
            keyfile: "test-key".into(),
            aws_region: None,
            data_key: Some(TEST_DATA_KEY.into()),
            s3_endpoint_url: None,
            port: default_port(),
            base_path: default_base_path(),
            api_docs_path: default_api_docs_path(),
            otel_exporter_otlp_endpoint: None,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_port(), 3000);
        assert_eq!(default_base_path(), "/identrust");
        assert_eq!(default_api_docs_path(), "swagger/swagger.json");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_valid_config() {
        let cfg = test_config();
        assert!(cfg.validate().is_ok());
        assert!(cfg.data_key().unwrap().is_some());
    }

    #[test]
    fn validate_rejects_empty_bucket() {
        let cfg = Config {
            bucket: " ".into(),
            ..test_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_keyfile() {
        let cfg = Config {
            keyfile: "".into(),
            ..test_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_malformed_base_path() {
        for base_path in ["identrust", "/identrust/"] {
            let cfg = Config {
                base_path: base_path.into(),
                ..test_config()
            };
            assert!(cfg.validate().is_err(), "{base_path} accepted");
        }
        let root = Config {
            base_path: "".into(),
            ..test_config()
        };
        assert!(root.validate().is_ok());
    }

    #[test]
    fn validate_rejects_short_data_key() {
        let cfg = Config {
            data_key: Some("c2hvcnQ=".into()),
            ..test_config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_or_blank_data_key_is_allowed() {
        for data_key in [None, Some("  ".to_owned())] {
            let cfg = Config {
                data_key,
                ..test_config()
            };
            assert!(cfg.validate().is_ok());
            assert!(cfg.data_key().unwrap().is_none());
        }
    }

    #[test]
    fn blank_region_is_unset() {
        let cfg = Config {
            aws_region: Some("".into()),
            ..test_config()
        };
        assert!(cfg.aws_region().is_none());
    }

    #[test]
    fn debug_redacts_data_key() {
        let out = format!("{:?}", test_config());
        assert!(out.contains("REDACTED"));
        assert!(!out.contains(TEST_DATA_KEY));
    }
}

//! Configuration management for Federa pods.

use serde::{Deserialize, Serialize};
#[cfg(feature = "toml")]
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub federation: FederationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Keyring entries loaded into the pod's key provider at startup.
    #[serde(default)]
    pub keys: Vec<KeyEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationConfig {
    /// Host name of this pod, e.g. `pod.example.org`.
    pub pod_host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

/// A single keyring entry.
///
/// Either half may be missing: a pod holds private keys only for its own
/// users, and public keys for remote people it has already discovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyEntry {
    /// Federation identity (`user@pod-host`)
    pub identity: String,
    /// Base64 encoded 32 byte Ed25519 seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Base64 encoded 32 byte Ed25519 public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl Config {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde cannot express.
    pub fn validate(&self) -> Result<(), crate::CoreError> {
        if self.federation.pod_host.trim().is_empty() {
            return Err(crate::CoreError::Config(
                "federation.pod_host must not be empty".to_string(),
            ));
        }

        for entry in &self.keys {
            if entry.private_key.is_none() && entry.public_key.is_none() {
                return Err(crate::CoreError::Config(format!(
                    "keyring entry '{}' has neither private_key nor public_key",
                    entry.identity
                )));
            }
        }

        Ok(())
    }

    pub fn default_config() -> Self {
        Self {
            federation: FederationConfig {
                pod_host: "localhost".to_string(),
            },
            logging: LoggingConfig::default(),
            keys: Vec::new(),
        }
    }
}

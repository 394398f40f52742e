//! API credential lookup
//!
//! The key is read once at startup: first from the process environment, then
//! from a YAML secrets file of `NAME: value` pairs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::SecretsConfig;

/// Errors raised while resolving the API credential
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("{key} not found in the environment or in {}", .path.display())]
    Missing { key: String, path: PathBuf },

    #[error("Failed to read secrets file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse secrets file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Key/value secrets loaded from a YAML file
#[derive(Debug, Default)]
pub struct SecretStore {
    values: HashMap<String, String>,
}

impl SecretStore {
    /// Load a secrets file; a missing file yields an empty store
    pub fn load(path: &Path) -> Result<Self, SecretError> {
        debug!(?path, "SecretStore::load: called");
        if !path.exists() {
            debug!("SecretStore::load: no secrets file");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SecretError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let values: HashMap<String, String> = if content.trim().is_empty() {
            HashMap::new()
        } else {
            serde_yaml::from_str(&content).map_err(|source| SecretError::Malformed {
                path: path.to_path_buf(),
                source,
            })?
        };

        debug!(count = values.len(), "SecretStore::load: loaded secrets");
        Ok(Self { values })
    }

    /// Non-empty value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
    }
}

/// Resolve the API key named by the config
pub fn resolve_api_key(config: &SecretsConfig) -> Result<String, SecretError> {
    debug!(key = %config.key_name, "resolve_api_key: called");
    if let Ok(value) = std::env::var(&config.key_name)
        && !value.trim().is_empty()
    {
        info!("API key loaded from environment variable {}", config.key_name);
        return Ok(value);
    }

    let store = SecretStore::load(&config.path)?;
    match store.get(&config.key_name) {
        Some(value) => {
            info!("API key loaded from {}", config.path.display());
            Ok(value.to_string())
        }
        None => Err(SecretError::Missing {
            key: config.key_name.clone(),
            path: config.path.clone(),
        }),
    }
}

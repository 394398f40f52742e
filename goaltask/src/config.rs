//! goaltask configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Main goaltask configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// HTTP listener configuration
    pub server: ServerConfig,

    /// Where the API credential is read from
    pub secrets: SecretsConfig,

    /// System prompt overrides
    pub prompt: PromptConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Fails fast on values the server cannot start with. A missing API key is
    /// not a validation failure: the page reports it to the user instead.
    pub fn validate(&self) -> Result<()> {
        debug!("Config::validate: called");
        self.server.socket_addr()?;

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(eyre::eyre!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(eyre::eyre!("llm.max-tokens must be greater than zero"));
        }

        if self.llm.timeout_ms == 0 {
            return Err(eyre::eyre!("llm.timeout-ms must be greater than zero"));
        }

        if self.server.session_ttl_secs == 0 {
            return Err(eyre::eyre!("server.session-ttl-secs must be greater than zero"));
        }

        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .goaltask.yml
        let local_config = PathBuf::from(".goaltask.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/goaltask/goaltask.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("goaltask").join("goaltask.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed: a broken config file is reported properly by
    /// [`Config::load`] once logging exists.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".goaltask.yml")];
                if let Some(config_dir) = dirs::config_dir() {
                    paths.push(config_dir.join("goaltask").join("goaltask.yml"));
                }
                paths
            }
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "openai" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            timeout_ms: 120_000,
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the web UI listens on
    pub bind: String,

    /// Idle seconds before a session's state is dropped
    #[serde(rename = "session-ttl-secs")]
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
            session_ttl_secs: 3600,
        }
    }
}

impl ServerConfig {
    /// Parse the bind address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .context(format!("Invalid server.bind address '{}'", self.bind))
    }

    /// Idle time after which a session is forgotten
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

/// Credential source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// YAML secrets file consulted when the environment lacks the key
    pub path: PathBuf,

    /// Name of the API key, both as env var and as secrets-file key
    #[serde(rename = "key-name")]
    pub key_name: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".goaltask/secrets.yml"),
            key_name: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// System prompt configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Explicit override file for the breakdown prompt
    #[serde(rename = "override-path")]
    pub override_path: Option<PathBuf>,
}

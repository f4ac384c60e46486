//! Learnloom configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main Learnloom configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnConfig {
    /// Generation service (HTTP endpoint) configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Generation client configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Upstream language-model provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Content storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Memory game timing
    #[serde(default)]
    pub memory_game: MemoryGameConfig,
}

impl LearnConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Serialize the configuration as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18791,
            cors_origins: Vec::new(),
        }
    }
}

/// Generation client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Full URL of the generate-learning endpoint
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Default number of quiz questions requested
    pub default_count: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:18791/functions/v1/generate-learning".to_string(),
            timeout_secs: 90,
            default_count: 5,
        }
    }
}

/// OpenAI-compatible chat-completions provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL (`/chat/completions` is appended)
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_ref: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ai.gateway.lovable.dev/v1".to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            api_key_ref: "lovable_api_key".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key from the environment.
    ///
    /// `api_key_ref` names an environment variable; the exact casing is tried
    /// first, then the UPPER_CASE form.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_ref)
            .or_else(|_| std::env::var(self.api_key_ref.to_uppercase()))
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory for storage
    pub base_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: dirs_next::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("learnloom"),
        }
    }
}

/// Memory game timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryGameConfig {
    /// Delay before a mismatched pair flips back, in milliseconds
    pub mismatch_delay_ms: u64,
}

impl MemoryGameConfig {
    /// Delay handed to a new memory game
    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }
}

impl Default for MemoryGameConfig {
    fn default() -> Self {
        Self {
            mismatch_delay_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LearnConfig::default();
        assert_eq!(config.service.port, 18791);
        assert!(config.service.cors_origins.is_empty());
        assert_eq!(config.client.default_count, 5);
        assert_eq!(config.memory_game.mismatch_delay_ms, 1000);
        assert!(config.storage.base_dir.ends_with("learnloom"));
    }

    #[test]
    fn test_mismatch_delay() {
        let config = MemoryGameConfig {
            mismatch_delay_ms: 250,
        };
        assert_eq!(config.mismatch_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LearnConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: LearnConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.provider.model, config.provider.model);
        assert_eq!(parsed.client.endpoint, config.client.endpoint);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: LearnConfig = toml::from_str(
            r#"
            [service]
            host = "0.0.0.0"
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(parsed.service.host, "0.0.0.0");
        assert_eq!(parsed.service.port, 8080);
        assert_eq!(parsed.provider.api_key_ref, "lovable_api_key");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[memory_game]\nmismatch_delay_ms = 250\n").unwrap();

        let config = LearnConfig::from_file(&path).unwrap();
        assert_eq!(config.memory_game.mismatch_delay_ms, 250);
    }

    #[test]
    fn test_from_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[service\nport = ").unwrap();

        assert!(matches!(
            LearnConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_resolve_api_key_uppercase_fallback() {
        let provider = ProviderConfig {
            api_key_ref: "learnloom_test_key_ref".to_string(),
            ..Default::default()
        };
        std::env::set_var("LEARNLOOM_TEST_KEY_REF", "  sk-test  ");
        assert_eq!(provider.resolve_api_key().as_deref(), Some("sk-test"));
        std::env::remove_var("LEARNLOOM_TEST_KEY_REF");
        assert!(provider.resolve_api_key().is_none());
    }
}

use serde::{Deserialize, Serialize};

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub relay: RelayConfig,
    pub storage: StorageConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            relay: RelayConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// Where the client sends message history for generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub endpoint: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8787/api/chat".to_string(),
        }
    }
}

/// Credentials and model selection for the upstream generation service.
/// The output-length cap and safety thresholds are fixed relay policy and
/// deliberately not part of this config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: Option<String>,
}

impl UpstreamConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://generativelanguage.googleapis.com";

    pub fn base_url(&self) -> &str {
        self.api_base.as_deref().unwrap_or(Self::DEFAULT_API_BASE)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            api_base: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
    /// Data directory for the file backend.
    pub data_dir: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Prefer the file backend, fall back to memory
    Auto,
    Memory,
    File,
}

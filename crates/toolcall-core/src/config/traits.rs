//! Configuration provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default orchestration settings as stored in configuration
///
/// Every field is optional so layers can override each other field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultSettings {
    /// Tool-execution rounds per request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tool_calls: Option<u32>,
    /// Execute proposed calls without asking the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_execute: Option<bool>,
    /// Sampling temperature forwarded to the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Token limit forwarded to the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Named tool-call marker convention (see `ToolCallMarkers::named`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers: Option<String>,
    /// Extra instructions placed before the tool description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Tools never exposed to the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_tools: Vec<String>,
}

impl DefaultSettings {
    /// Overlay `other` on top of `self`; set fields in `other` win
    pub fn merge(self, other: DefaultSettings) -> DefaultSettings {
        DefaultSettings {
            max_tool_calls: other.max_tool_calls.or(self.max_tool_calls),
            auto_execute: other.auto_execute.or(self.auto_execute),
            temperature: other.temperature.or(self.temperature),
            max_tokens: other.max_tokens.or(self.max_tokens),
            markers: other.markers.or(self.markers),
            system_prompt: other.system_prompt.or(self.system_prompt),
            disabled_tools: if other.disabled_tools.is_empty() {
                self.disabled_tools
            } else {
                other.disabled_tools
            },
        }
    }
}

/// Configuration provider abstraction
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory for testing
/// - `FileConfigProvider`: YAML file (user or workspace level)
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Human-readable name of this source
    fn source(&self) -> String;

    /// Read the stored defaults
    async fn get_defaults(&self) -> ConfigResult<DefaultSettings>;

    /// Replace the stored defaults
    async fn set_defaults(&self, defaults: DefaultSettings) -> ConfigResult<()>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown marker preset: {0}")]
    UnknownMarkers(String),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

//! Per-request orchestration settings

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult, DefaultSettings};
use crate::parser::ToolCallMarkers;
use crate::providers::GenerateOptions;
use crate::tools::ToolFilter;
use crate::types::ToolSchema;

/// Tool-execution rounds allowed when nothing else is configured
pub const DEFAULT_MAX_TOOL_CALLS: u32 = 3;

fn default_max_tool_calls() -> u32 {
    DEFAULT_MAX_TOOL_CALLS
}

fn default_auto_execute() -> bool {
    true
}

/// Settings recognized by `generate_with_tools`
///
/// Deserializes from the JSON a host passes, e.g.
/// `{"tools": [...], "maxToolCalls": 2, "autoExecute": true, "temperature": 0.2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallingConfig {
    /// Tools exposed to the model; empty exposes every registered tool
    #[serde(default)]
    pub tools: Vec<ToolSchema>,
    /// Round budget
    #[serde(default = "default_max_tool_calls")]
    pub max_tool_calls: u32,
    /// Execute proposed calls without asking the caller
    #[serde(default = "default_auto_execute")]
    pub auto_execute: bool,
    /// Forwarded to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Forwarded to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Extra instructions placed before the tool description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Registered tools hidden from this request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_tools: Vec<String>,
}

impl Default for ToolCallingConfig {
    fn default() -> Self {
        Self {
            tools: Vec::new(),
            max_tool_calls: DEFAULT_MAX_TOOL_CALLS,
            auto_execute: true,
            temperature: None,
            max_tokens: None,
            system_prompt: None,
            disabled_tools: Vec::new(),
        }
    }
}

impl ToolCallingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in defaults with configured `defaults` laid over them
    pub fn from_defaults(defaults: &DefaultSettings) -> Self {
        let builtin = Self::default();
        Self {
            tools: Vec::new(),
            max_tool_calls: defaults.max_tool_calls.unwrap_or(builtin.max_tool_calls),
            auto_execute: defaults.auto_execute.unwrap_or(builtin.auto_execute),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            system_prompt: defaults.system_prompt.clone(),
            disabled_tools: defaults.disabled_tools.clone(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_tool_calls(mut self, max: u32) -> Self {
        self.max_tool_calls = max;
        self
    }

    pub fn with_auto_execute(mut self, auto_execute: bool) -> Self {
        self.auto_execute = auto_execute;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Which registered tools this request may see and call
    pub fn filter(&self) -> ToolFilter {
        ToolFilter::from_schemas(&self.tools).with_exclude(self.disabled_tools.iter().cloned())
    }

    /// Options handed to the model unchanged
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: None,
        }
    }
}

/// Marker convention named in `defaults`, or the default tags
pub fn resolve_markers(defaults: &DefaultSettings) -> ConfigResult<ToolCallMarkers> {
    match defaults.markers.as_deref() {
        None => Ok(ToolCallMarkers::default()),
        Some(name) => ToolCallMarkers::named(name)
            .ok_or_else(|| ConfigError::UnknownMarkers(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolCallingConfig::default();
        assert_eq!(config.max_tool_calls, 3);
        assert!(config.auto_execute);
        assert!(config.tools.is_empty());
        assert_eq!(config.generate_options(), GenerateOptions::default());
    }

    #[test]
    fn test_deserialize_from_host_json() {
        let config: ToolCallingConfig = serde_json::from_str(
            r#"{
                "tools": [{"name": "get_weather", "description": "Weather"}],
                "maxToolCalls": 1,
                "temperature": 0.2,
                "maxTokens": 256
            }"#,
        )
        .unwrap();

        assert_eq!(config.tools[0].name, "get_weather");
        assert_eq!(config.max_tool_calls, 1);
        assert!(config.auto_execute);
        assert_eq!(config.generate_options().temperature, Some(0.2));
        assert_eq!(config.generate_options().max_tokens, Some(256));

        let empty: ToolCallingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ToolCallingConfig::default());
    }

    #[test]
    fn test_from_defaults_overlays_builtin() {
        let config = ToolCallingConfig::from_defaults(&DefaultSettings {
            auto_execute: Some(false),
            temperature: Some(0.5),
            ..Default::default()
        });
        assert_eq!(config.max_tool_calls, DEFAULT_MAX_TOOL_CALLS);
        assert!(!config.auto_execute);
        assert_eq!(config.temperature, Some(0.5));
    }

    #[test]
    fn test_filter_combines_tools_and_disabled() {
        let mut config = ToolCallingConfig::new().with_tools(vec![
            ToolSchema::new("get_weather", ""),
            ToolSchema::new("calculate", ""),
        ]);
        config.disabled_tools = vec!["calculate".to_string()];

        let filter = config.filter();
        assert!(filter.matches("get_weather"));
        assert!(!filter.matches("calculate"));
        assert!(!filter.matches("get_time"));

        assert!(ToolCallingConfig::new().filter().matches("anything"));
    }

    #[test]
    fn test_resolve_markers() {
        let default = resolve_markers(&DefaultSettings::default()).unwrap();
        assert_eq!(default, ToolCallMarkers::default());

        let named = resolve_markers(&DefaultSettings {
            markers: Some("function_call".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(named.open, "<function_call>");

        let unknown = resolve_markers(&DefaultSettings {
            markers: Some("xml".to_string()),
            ..Default::default()
        });
        assert!(matches!(unknown, Err(ConfigError::UnknownMarkers(name)) if name == "xml"));
    }
}

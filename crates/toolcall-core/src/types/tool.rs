//! Tool call and result types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Argument mapping passed to and returned from tools
pub type Arguments = Map<String, Value>;

/// Tool call proposed by the model (not yet validated)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    /// Name of the tool being called
    pub tool_name: String,
    /// Arguments as emitted by the model
    #[serde(default)]
    pub arguments: Arguments,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(tool_name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Add an argument
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }

    /// Get an argument as a string
    pub fn get_arg_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get an argument as an f64
    pub fn get_arg_f64(&self, key: &str) -> Option<f64> {
        self.arguments.get(key).and_then(|v| v.as_f64())
    }

    /// Get an argument as a bool
    pub fn get_arg_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }
}

/// Outcome of executing one tool call
///
/// `result` is present iff `success`; `error` is present iff not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Name of the tool that was called
    pub tool_name: String,
    /// Whether the call succeeded
    pub success: bool,
    /// Returned mapping on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Arguments>,
    /// Failure message otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(tool_name: impl Into<String>, result: Arguments) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// Create a failed tool result
    pub fn failure(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Everything produced by one orchestration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallingResult {
    /// Final model response, possibly empty
    pub text: String,
    /// Calls in the order they were proposed
    pub tool_calls: Vec<ToolCall>,
    /// Results, parallel-indexed with `tool_calls` when calls were executed
    pub tool_results: Vec<ToolResult>,
}

impl ToolCallingResult {
    /// A result with text only
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Number of calls that ran successfully
    pub fn successful_calls(&self) -> usize {
        self.tool_results.iter().filter(|r| r.success).count()
    }
}

/// Result of scanning model text for a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedOutput {
    /// First well-formed call, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    /// Remaining prose with the matched call markup removed
    pub text: String,
}

impl ParsedOutput {
    /// Output with no tool call
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            tool_call: None,
            text: text.into(),
        }
    }

    /// Whether a call was found
    pub fn has_tool_call(&self) -> bool {
        self.tool_call.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_call_args() {
        let call = ToolCall::new("get_weather", Arguments::new())
            .with_arg("city", "San Francisco")
            .with_arg("days", 3)
            .with_arg("detailed", true);

        assert_eq!(call.get_arg_str("city"), Some("San Francisco"));
        assert_eq!(call.get_arg_f64("days"), Some(3.0));
        assert_eq!(call.get_arg_bool("detailed"), Some(true));
        assert_eq!(call.get_arg_str("nonexistent"), None);
    }

    #[test]
    fn test_tool_result_invariants() {
        let mut payload = Arguments::new();
        payload.insert("temperature".to_string(), json!(72));

        let ok = ToolResult::success("get_weather", payload);
        assert!(ok.success);
        assert!(ok.result.is_some());
        assert!(ok.error.is_none());

        let failed = ToolResult::failure("get_weather", "City not found");
        assert!(!failed.success);
        assert!(failed.result.is_none());
        assert_eq!(failed.error.as_deref(), Some("City not found"));
    }

    #[test]
    fn test_result_serialization_uses_camel_case() {
        let result = ToolCallingResult {
            text: "done".to_string(),
            tool_calls: vec![ToolCall::new("get_time", Arguments::new())],
            tool_results: vec![ToolResult::failure("get_time", "boom")],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["toolCalls"][0]["toolName"], "get_time");
        assert_eq!(value["toolResults"][0]["success"], false);
        assert!(value["toolResults"][0].get("result").is_none());
        assert_eq!(result.successful_calls(), 0);
    }
}

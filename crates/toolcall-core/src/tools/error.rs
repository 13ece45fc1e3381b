//! Tool validation and execution errors

use serde_json::Value;
use thiserror::Error;

use crate::types::ParameterType;

/// A call's arguments don't satisfy its schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required argument '{parameter}'")]
    MissingRequiredArgument { parameter: String },

    #[error("Invalid value {value} for '{parameter}', expected one of {}", format_allowed(.allowed))]
    InvalidEnumValue {
        parameter: String,
        value: Value,
        allowed: Vec<Value>,
    },

    #[error("Argument '{parameter}' should be a {expected}, got {value}")]
    TypeMismatch {
        parameter: String,
        expected: ParameterType,
        value: Value,
    },
}

impl ValidationError {
    /// Name of the offending parameter
    pub fn parameter(&self) -> &str {
        match self {
            ValidationError::MissingRequiredArgument { parameter }
            | ValidationError::InvalidEnumValue { parameter, .. }
            | ValidationError::TypeMismatch { parameter, .. } => parameter,
        }
    }
}

fn format_allowed(allowed: &[Value]) -> String {
    let items: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

/// Failure raised by a tool handler
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ToolError {
    pub message: String,
}

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<String> for ToolError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ToolError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

/// Why a tool call produced a failed result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionFailure {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool '{tool}' is not available for this request")]
    NotExposed { tool: String },

    #[error("Invalid arguments for '{tool}': {source}")]
    Validation {
        tool: String,
        #[source]
        source: ValidationError,
    },

    #[error("Tool '{tool}' failed: {source}")]
    Handler {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("Tool '{tool}' panicked: {message}")]
    Panicked { tool: String, message: String },
}

pub type ToolHandlerResult<T> = Result<T, ToolError>;

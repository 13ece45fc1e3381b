//! Tool schema types
//!
//! A `ToolSchema` describes a callable tool to the model: its name, what it
//! does, and the typed parameters it accepts. Schemas are immutable once
//! registered.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Declared type of a tool parameter
///
/// Types are advisory: the validator coerces loosely typed model output
/// towards the declared type before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Integer => "integer",
            ParameterType::Boolean => "boolean",
            ParameterType::Array => "array",
            ParameterType::Object => "object",
        }
    }

    /// Check whether a value already has this type (no coercion)
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParameterType::String => value.is_string(),
            ParameterType::Number => value.is_number(),
            ParameterType::Integer => value.is_i64() || value.is_u64(),
            ParameterType::Boolean => value.is_boolean(),
            ParameterType::Array => value.is_array(),
            ParameterType::Object => value.is_object(),
        }
    }
}

impl Default for ParameterType {
    fn default() -> Self {
        ParameterType::String
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolParameter {
    /// Parameter name, unique within its tool
    pub name: String,
    /// Declared type
    #[serde(rename = "type", default)]
    pub param_type: ParameterType,
    /// What the parameter means, shown to the model
    #[serde(default)]
    pub description: String,
    /// Whether the parameter must be supplied by the model
    #[serde(default)]
    pub required: bool,
    /// Value substituted when the parameter is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Ordered set of allowed values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
}

impl ToolParameter {
    /// Create a new optional parameter
    pub fn new(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: false,
            default_value: None,
            allowed_values: None,
        }
    }

    /// Shorthand for an optional string parameter
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterType::String, description)
    }

    /// Shorthand for an optional number parameter
    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Number, description)
    }

    /// Shorthand for an optional boolean parameter
    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Boolean, description)
    }

    /// Mark the parameter as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Restrict the parameter to an ordered set of values
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `value` is one of the allowed values (always true without an enum)
    pub fn allows(&self, value: &Value) -> bool {
        match &self.allowed_values {
            Some(_) => self.enum_member(value).is_some(),
            None => true,
        }
    }

    /// The enum entry equal to `value`; numbers compare by value, so `2.0` finds `2`
    pub fn enum_member(&self, value: &Value) -> Option<&Value> {
        self.allowed_values
            .as_ref()?
            .iter()
            .find(|allowed| same_value(allowed, value))
    }

    fn to_json_schema(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".to_string(), json!(self.param_type.as_str()));
        if !self.description.is_empty() {
            prop.insert("description".to_string(), json!(self.description));
        }
        if let Some(ref allowed) = self.allowed_values {
            prop.insert("enum".to_string(), Value::Array(allowed.clone()));
        }
        if let Some(ref default) = self.default_value {
            prop.insert("default".to_string(), default.clone());
        }
        Value::Object(prop)
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Errors for schemas that can never be satisfied
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Tool name must not be empty")]
    EmptyName,

    #[error("Tool '{tool}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { tool: String, parameter: String },

    #[error("Default for '{tool}.{parameter}' is not a {expected}")]
    DefaultTypeMismatch {
        tool: String,
        parameter: String,
        expected: ParameterType,
    },

    #[error("Default for '{tool}.{parameter}' is not one of its allowed values")]
    DefaultNotInEnum { tool: String, parameter: String },
}

/// Description of a callable tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name, unique within a registry
    pub name: String,
    /// What the tool does, shown to the model
    #[serde(default)]
    pub description: String,
    /// Ordered parameter list
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
}

impl ToolSchema {
    /// Create a schema without parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Names of the required parameters, in declaration order
    pub fn required_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }

    /// Reject schemas that no call could ever satisfy
    pub fn check(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let mut seen = HashSet::new();
        for param in &self.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(SchemaError::DuplicateParameter {
                    tool: self.name.clone(),
                    parameter: param.name.clone(),
                });
            }

            if let Some(ref default) = param.default_value {
                if !param.param_type.matches(default) {
                    return Err(SchemaError::DefaultTypeMismatch {
                        tool: self.name.clone(),
                        parameter: param.name.clone(),
                        expected: param.param_type,
                    });
                }
                if !param.allows(default) {
                    return Err(SchemaError::DefaultNotInEnum {
                        tool: self.name.clone(),
                        parameter: param.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Render the parameters as a JSON Schema object
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_json_schema()))
            .collect();
        let required: Vec<&str> = self.required_parameters().collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Render the schema the way it is presented to the model
    pub fn to_model_json(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.to_json_schema(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_schema() -> ToolSchema {
        ToolSchema::new("get_weather", "Get the current weather for a city")
            .with_parameter(ToolParameter::string("city", "City name").required())
            .with_parameter(
                ToolParameter::string("unit", "Temperature unit")
                    .with_enum(["celsius", "fahrenheit"])
                    .with_default("celsius"),
            )
    }

    #[test]
    fn test_schema_builder() {
        let schema = weather_schema();
        assert_eq!(schema.name, "get_weather");
        assert_eq!(schema.parameters.len(), 2);
        assert!(schema.parameter("city").unwrap().required);
        assert_eq!(schema.required_parameters().collect::<Vec<_>>(), vec!["city"]);
        assert!(schema.check().is_ok());
    }

    #[test]
    fn test_json_schema_rendering() {
        let rendered = weather_schema().to_json_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["properties"]["city"]["type"], "string");
        assert_eq!(rendered["properties"]["unit"]["enum"], json!(["celsius", "fahrenheit"]));
        assert_eq!(rendered["properties"]["unit"]["default"], "celsius");
        assert_eq!(rendered["required"], json!(["city"]));
    }

    #[test]
    fn test_check_rejects_duplicate_parameters() {
        let schema = ToolSchema::new("dup", "")
            .with_parameter(ToolParameter::string("a", ""))
            .with_parameter(ToolParameter::number("a", ""));
        assert!(matches!(schema.check(), Err(SchemaError::DuplicateParameter { .. })));
    }

    #[test]
    fn test_check_rejects_bad_defaults() {
        let wrong_type = ToolSchema::new("t", "")
            .with_parameter(ToolParameter::boolean("flag", "").with_default("yes"));
        assert!(matches!(wrong_type.check(), Err(SchemaError::DefaultTypeMismatch { .. })));

        let not_allowed = ToolSchema::new("t", "").with_parameter(
            ToolParameter::string("unit", "")
                .with_enum(["celsius", "fahrenheit"])
                .with_default("kelvin"),
        );
        assert!(matches!(not_allowed.check(), Err(SchemaError::DefaultNotInEnum { .. })));

        assert_eq!(ToolSchema::new("  ", "").check(), Err(SchemaError::EmptyName));
    }

    #[test]
    fn test_schema_deserializes_from_host_json() {
        let schema: ToolSchema = serde_json::from_value(json!({
            "name": "calculate",
            "description": "Evaluate an expression",
            "parameters": [
                { "name": "expression", "type": "string", "description": "Math", "required": true },
                { "name": "precision", "type": "integer", "defaultValue": 2 }
            ]
        }))
        .unwrap();

        assert_eq!(schema.parameters[1].param_type, ParameterType::Integer);
        assert_eq!(schema.parameters[1].default_value, Some(json!(2)));
        assert!(!schema.parameters[1].required);
    }
}

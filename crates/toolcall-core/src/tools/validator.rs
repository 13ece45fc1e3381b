//! Argument validation against a tool schema
//!
//! Model-generated arguments are loosely typed: numbers arrive as strings,
//! booleans as "true", objects as JSON text. Validation coerces towards the
//! declared type and only fails when no sensible reading exists.

use serde_json::{Number, Value};

use super::error::ValidationError;
use crate::types::{Arguments, ParameterType, ToolParameter, ToolSchema};

/// Validate and normalize `arguments` for `schema`
///
/// - absent + required => `MissingRequiredArgument`
/// - absent + optional => default substituted when declared, else left absent
/// - present => coerced to the declared type, then checked against `enum`
/// - keys the schema doesn't declare pass through untouched
///
/// An explicit `null` counts as absent.
pub fn validate_arguments(
    schema: &ToolSchema,
    arguments: &Arguments,
) -> Result<Arguments, ValidationError> {
    let mut normalized = Arguments::new();

    for param in &schema.parameters {
        let provided = arguments.get(&param.name).filter(|v| !v.is_null());

        let value = match provided {
            Some(raw) => coerce(param, raw)?,
            None => match param.default_value {
                Some(ref default) => default.clone(),
                None if param.required => {
                    return Err(ValidationError::MissingRequiredArgument {
                        parameter: param.name.clone(),
                    });
                }
                None => continue,
            },
        };

        // Enum-constrained values are normalized to the declared member
        let value = match param.allowed_values {
            Some(ref allowed) => match param.enum_member(&value) {
                Some(member) => member.clone(),
                None => {
                    return Err(ValidationError::InvalidEnumValue {
                        parameter: param.name.clone(),
                        value,
                        allowed: allowed.clone(),
                    });
                }
            },
            None => value,
        };

        normalized.insert(param.name.clone(), value);
    }

    for (key, value) in arguments {
        if schema.parameter(key).is_none() {
            normalized.insert(key.clone(), value.clone());
        }
    }

    Ok(normalized)
}

fn coerce(param: &ToolParameter, raw: &Value) -> Result<Value, ValidationError> {
    let coerced = match param.param_type {
        ParameterType::String => to_string(raw),
        ParameterType::Number => to_number(raw),
        ParameterType::Integer => to_integer(raw),
        ParameterType::Boolean => to_boolean(raw),
        ParameterType::Array => parse_embedded(raw, Value::is_array),
        ParameterType::Object => parse_embedded(raw, Value::is_object),
    };

    coerced.ok_or_else(|| ValidationError::TypeMismatch {
        parameter: param.name.clone(),
        expected: param.param_type,
        value: raw.clone(),
    })
}

fn to_string(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(_) => Some(raw.clone()),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

fn to_number(raw: &Value) -> Option<Value> {
    match raw {
        Value::Number(_) => Some(raw.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Value::from(i));
            }
            s.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        }
        _ => None,
    }
}

fn to_integer(raw: &Value) -> Option<Value> {
    let from_f64 = |f: f64| {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Some(Value::from(f as i64))
        } else {
            None
        }
    };

    match raw {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(raw.clone()),
        Value::Number(n) => n.as_f64().and_then(from_f64),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => Some(Value::from(i)),
                Err(_) => s.parse::<f64>().ok().and_then(from_f64),
            }
        }
        _ => None,
    }
}

fn to_boolean(raw: &Value) -> Option<Value> {
    match raw {
        Value::Bool(_) => Some(raw.clone()),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        _ => None,
    }
}

/// Accept the value as-is, or decode it from a JSON string
fn parse_embedded(raw: &Value, is_kind: fn(&Value) -> bool) -> Option<Value> {
    if is_kind(raw) {
        return Some(raw.clone());
    }
    match raw {
        Value::String(s) => serde_json::from_str::<Value>(s.trim())
            .ok()
            .filter(|v| is_kind(v)),
        _ => None,
    }
}

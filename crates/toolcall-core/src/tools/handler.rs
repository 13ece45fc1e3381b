//! Tool handler trait
//!
//! A handler is the function behind a tool: it receives validated arguments
//! and returns a result mapping. Handlers are pure collaborators; they own
//! their own retries and timeouts.

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use super::error::{ToolError, ToolHandlerResult};
use crate::types::Arguments;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run the tool with validated arguments
    async fn call(&self, arguments: Arguments) -> ToolHandlerResult<Arguments>;
}

/// Adapts an async closure into a `ToolHandler`
///
/// ```rust,ignore
/// let handler = FnHandler::new(|args: Arguments| async move {
///     let mut out = Arguments::new();
///     out.insert("echo".into(), Value::Object(args));
///     Ok(out)
/// });
/// ```
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = ToolHandlerResult<Arguments>> + Send,
{
    async fn call(&self, arguments: Arguments) -> ToolHandlerResult<Arguments> {
        (self.func)(arguments).await
    }
}

/// Interpret a host-side return value as a tool result mapping
///
/// `null` (a function that returned nothing) is an empty mapping; anything
/// other than an object is a failure.
pub fn arguments_from_value(tool: &str, value: Value) -> ToolHandlerResult<Arguments> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Arguments::new()),
        other => Err(ToolError::new(format!(
            "Tool {} returned {} instead of an object",
            tool, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fn_handler_passes_arguments_through() {
        let handler = FnHandler::new(|args: Arguments| async move {
            let city = args.get("city").and_then(|v| v.as_str()).unwrap_or("?").to_string();
            let mut out = Arguments::new();
            out.insert("city".to_string(), json!(city));
            out.insert("temperature".to_string(), json!(18));
            Ok(out)
        });

        let mut args = Arguments::new();
        args.insert("city".to_string(), json!("SF"));
        let out = handler.call(args).await.unwrap();
        assert_eq!(out["city"], "SF");
        assert_eq!(out["temperature"], 18);
    }

    #[tokio::test]
    async fn test_fn_handler_propagates_errors() {
        let handler = FnHandler::new(|_args: Arguments| async move {
            Err::<Arguments, _>(ToolError::new("offline"))
        });
        let err = handler.call(Arguments::new()).await.unwrap_err();
        assert_eq!(err.message, "offline");
    }

    #[test]
    fn test_host_values_become_result_mappings() {
        let out = arguments_from_value("get_time", json!({"time": "12:00"})).unwrap();
        assert_eq!(out["time"], "12:00");

        assert!(arguments_from_value("get_time", Value::Null).unwrap().is_empty());

        let err = arguments_from_value("get_time", json!("12:00")).unwrap_err();
        assert!(err.message.contains("get_time"));
        assert!(err.message.contains("instead of an object"));
        assert!(arguments_from_value("get_time", json!([1, 2])).is_err());
    }
}

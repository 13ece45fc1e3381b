//! Tool execution
//!
//! Every outcome of running a call, good or bad, ends up as a `ToolResult`.
//! Unknown tools, invalid arguments, handler errors and handler panics are
//! reported as failed results; nothing propagates to the caller.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;

use super::error::ExecutionFailure;
use super::registry::{ToolFilter, ToolRegistration, ToolRegistry};
use super::validator::validate_arguments;
use crate::logging::{Logger, SharedLogger};
use crate::{log_debug, log_info, log_warn};
use crate::types::{Arguments, ToolCall, ToolResult};

/// Runs tool calls against registered handlers
pub struct ToolExecutor {
    logger: SharedLogger,
}

impl ToolExecutor {
    pub fn new(logger: SharedLogger) -> Self {
        Self { logger }
    }

    /// Resolve, validate and run `call`
    ///
    /// `filter` limits which registered tools this request may use.
    pub async fn run_call(
        &self,
        registry: &ToolRegistry,
        filter: &ToolFilter,
        call: &ToolCall,
    ) -> ToolResult {
        let name = call.tool_name.as_str();

        let registration = match registry.lookup(name) {
            Some(r) => r,
            None => return self.fail(ExecutionFailure::UnknownTool(name.to_string()), name),
        };
        if !filter.matches(name) {
            return self.fail(ExecutionFailure::NotExposed { tool: name.to_string() }, name);
        }

        match validate_arguments(&registration.schema, &call.arguments) {
            Ok(arguments) => self.execute(&registration, arguments).await,
            Err(source) => self.fail(
                ExecutionFailure::Validation { tool: name.to_string(), source },
                name,
            ),
        }
    }

    /// Run a registration's handler with already-validated arguments
    ///
    /// Single shot: no retries.
    pub async fn execute(&self, registration: &ToolRegistration, arguments: Arguments) -> ToolResult {
        let name = registration.name();
        log_info!(self.logger, "[ToolExecutor] Calling tool: {}", name);

        let started = Instant::now();
        let outcome = AssertUnwindSafe(registration.handler.call(arguments))
            .catch_unwind()
            .await;
        let elapsed_ms = started.elapsed().as_millis();

        match outcome {
            Ok(Ok(result)) => {
                log_debug!(
                    self.logger,
                    "[ToolExecutor] Tool {} succeeded in {}ms",
                    name, elapsed_ms
                );
                ToolResult::success(name, result)
            }
            Ok(Err(source)) => self.fail(
                ExecutionFailure::Handler { tool: name.to_string(), source },
                name,
            ),
            Err(payload) => self.fail(
                ExecutionFailure::Panicked {
                    tool: name.to_string(),
                    message: panic_message(payload.as_ref()),
                },
                name,
            ),
        }
    }

    fn fail(&self, failure: ExecutionFailure, name: &str) -> ToolResult {
        log_warn!(self.logger, "[ToolExecutor] {}", failure);
        ToolResult::failure(name, failure.to_string())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::tools::ToolError;
    use crate::types::{ToolParameter, ToolSchema};
    use serde_json::json;

    fn setup() -> (ToolRegistry, ToolExecutor, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        let registry = ToolRegistry::new(Arc::new(NoOpLogger::new()));

        registry
            .register_fn(
                ToolSchema::new("get_weather", "Weather lookup")
                    .with_parameter(ToolParameter::string("city", "City").required())
                    .with_parameter(
                        ToolParameter::string("unit", "Unit")
                            .with_enum(["celsius", "fahrenheit"])
                            .with_default("celsius"),
                    ),
                |args: Arguments| async move {
                    let mut out = Arguments::new();
                    out.insert("city".into(), args["city"].clone());
                    out.insert("unit".into(), args["unit"].clone());
                    out.insert("temperature".into(), json!(21));
                    Ok(out)
                },
            )
            .unwrap();
        registry
            .register_fn(ToolSchema::new("flaky", "Always fails"), |_args: Arguments| async move {
                Err(ToolError::new("upstream timed out"))
            })
            .unwrap();
        registry
            .register_fn(ToolSchema::new("broken", "Panics"), |_args: Arguments| async move {
                if true {
                    panic!("index out of range");
                }
                Ok(Arguments::new())
            })
            .unwrap();

        let executor = ToolExecutor::new(logger.clone());
        (registry, executor, logger)
    }

    fn call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall::new(name, arguments.as_object().cloned().unwrap_or_default())
    }

    #[tokio::test]
    async fn test_successful_call_uses_normalized_arguments() {
        let (registry, executor, _) = setup();
        let result = executor
            .run_call(&registry, &ToolFilter::all(), &call("get_weather", json!({"city": "SF"})))
            .await;

        assert!(result.success);
        let payload = result.result.unwrap();
        assert_eq!(payload["city"], "SF");
        assert_eq!(payload["unit"], "celsius");
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_handler_error_becomes_failed_result() {
        let (registry, executor, logger) = setup();
        let result = executor
            .run_call(&registry, &ToolFilter::all(), &call("flaky", json!({})))
            .await;

        assert!(!result.success);
        assert!(result.result.is_none());
        assert!(result.error.unwrap().contains("upstream timed out"));
        assert_eq!(logger.messages_at(LogLevel::Warn).len(), 1);
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_failed_result() {
        let (registry, executor, _) = setup();
        let result = executor
            .run_call(&registry, &ToolFilter::all(), &call("broken", json!({})))
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("index out of range"));
    }

    #[tokio::test]
    async fn test_validation_failure_is_reported() {
        let (registry, executor, _) = setup();
        let result = executor
            .run_call(
                &registry,
                &ToolFilter::all(),
                &call("get_weather", json!({"city": "SF", "unit": "kelvin"})),
            )
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("unit"));
    }

    #[tokio::test]
    async fn test_unknown_and_hidden_tools() {
        let (registry, executor, _) = setup();

        let unknown = executor
            .run_call(&registry, &ToolFilter::all(), &call("get_time", json!({})))
            .await;
        assert_eq!(unknown.error.as_deref(), Some("Unknown tool: get_time"));

        let hidden = ToolFilter::all().with_exclude(["flaky".to_string()]);
        let result = executor.run_call(&registry, &hidden, &call("flaky", json!({}))).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("not available"));
    }
}

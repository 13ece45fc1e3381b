//! Toolcall Core
//!
//! Runtime-agnostic tool-calling orchestration for language models.
//! This crate provides the core functionality that can be used from any environment
//! (Node.js via napi-rs, native CLI, etc.)
//!
//! ## Pipeline
//!
//! ```text
//! prompt -> ToolOrchestrator -> Provider (model) -> raw text
//!        -> ToolCallParser -> ToolCall -> validate_arguments
//!        -> ToolExecutor (via ToolRegistry) -> ToolResult -> back to the model
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolcall_core::{ToolRegistry, ToolOrchestrator, ToolCallingConfig, ToolSchema, ToolParameter};
//!
//! let registry = Arc::new(ToolRegistry::new(logger.clone()));
//! registry.register_fn(
//!     ToolSchema::new("get_weather", "Get the weather for a city")
//!         .with_parameter(ToolParameter::string("city", "City name").required()),
//!     |args| async move { Ok(lookup_weather(args).await?) },
//! )?;
//!
//! let orchestrator = ToolOrchestrator::new(provider, registry, logger);
//! let result = orchestrator.generate_with_tools("Weather in SF?", &ToolCallingConfig::default()).await?;
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod providers;
pub mod tools;
pub mod parser;
pub mod orchestrator;

// Re-export commonly used types
pub use types::{
    Arguments, ChatMessage, MessageRole,
    ParameterType, SchemaError, ToolParameter, ToolSchema,
    ParsedOutput, ToolCall, ToolCallingResult, ToolResult,
    StreamChunk,
    CancellationToken,
};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger, MemoryLogger};

pub use config::{
    ConfigProvider, ConfigError, ConfigResolver, DefaultSettings,
    FileConfigProvider, MemoryConfigProvider,
};

pub use providers::{
    CallbackProvider, GenerateOptions, MockProvider, Provider, ProviderError, ProviderResult,
};

pub use tools::{
    validate_arguments, ExecutionFailure, ToolError, ToolExecutor, ToolFilter, ToolHandler,
    ToolRegistry, ValidationError,
};

pub use parser::{parse_tool_call, ToolCallMarkers, ToolCallParser};

pub use orchestrator::{
    OrchestratorError, OrchestratorResult, OrchestratorState, ToolCallingConfig, ToolOrchestrator,
};

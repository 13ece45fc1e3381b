//! Core types for tool calling
//!
//! This module contains the shared types used by the parser, validator,
//! executor and orchestrator.

mod schema;
mod tool;
mod message;
mod stream;
mod cancellation;

pub use schema::{ParameterType, SchemaError, ToolParameter, ToolSchema};
pub use tool::{Arguments, ParsedOutput, ToolCall, ToolCallingResult, ToolResult};
pub use message::{ChatMessage, MessageRole};
pub use stream::StreamChunk;
pub use cancellation::CancellationToken;

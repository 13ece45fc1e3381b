//! Tool management module
//!
//! Registration, validation and execution of tools for LLM tool calling.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ToolRegistry                               │
//! │    name -> (ToolSchema, ToolHandler)        │
//! │    written once, read by every request      │
//! └─────────────────────────────────────────────┘
//!           │ lookup
//!           ▼
//! ┌─────────────────────────────────────────────┐
//! │  ToolExecutor                               │
//! │    validate_arguments (coerce, defaults,    │
//! │    enums) -> handler.call -> ToolResult     │
//! └─────────────────────────────────────────────┘
//! ```

mod error;
mod handler;
mod registry;
mod validator;
mod executor;

pub use error::{ExecutionFailure, ToolError, ToolHandlerResult, ValidationError};
pub use handler::{arguments_from_value, FnHandler, ToolHandler};
pub use registry::{ToolFilter, ToolRegistration, ToolRegistry};
pub use validator::validate_arguments;
pub use executor::ToolExecutor;

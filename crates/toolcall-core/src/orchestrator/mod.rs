//! End-to-end tool-calling orchestration
//!
//! ```rust,ignore
//! use toolcall_core::orchestrator::{ToolOrchestrator, ToolCallingConfig};
//!
//! let orchestrator = ToolOrchestrator::new(provider, registry, logger);
//! let result = orchestrator
//!     .generate_with_tools("What's the weather in Paris?", &ToolCallingConfig::default())
//!     .await?;
//! println!("{} ({} tool calls)", result.text, result.tool_calls.len());
//! ```

mod config;
mod engine;
mod error;
mod prompt;
mod state;

pub use config::{resolve_markers, ToolCallingConfig, DEFAULT_MAX_TOOL_CALLS};
pub use engine::ToolOrchestrator;
pub use error::{OrchestratorError, OrchestratorResult};
pub use prompt::{render_system_prompt, render_tool_response};
pub use state::OrchestratorState;

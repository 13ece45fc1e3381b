//! Tool-call parsing
//!
//! Extracts structured calls from the text a model generates, using a
//! configurable tag convention around a JSON payload.

mod markers;
mod call_parser;

pub use markers::ToolCallMarkers;
pub use call_parser::{parse_tool_call, ToolCallParser};

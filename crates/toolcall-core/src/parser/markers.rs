//! Tool-call marker conventions
//!
//! Models wrap a tool call in an opening and closing tag. The tags differ
//! between model families, so they are configurable and a few common
//! conventions are available by name.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Opening and closing tags around a tool-call payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallMarkers {
    pub open: String,
    pub close: String,
}

impl ToolCallMarkers {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Look up a named convention (case-insensitive)
    pub fn named(name: &str) -> Option<Self> {
        PRESETS.get(name.trim().to_lowercase().as_str()).cloned()
    }

    /// Names accepted by `named`, sorted
    pub fn preset_names() -> Vec<&'static str> {
        PRESETS.keys().copied().collect()
    }

    /// Both tags are non-empty
    pub fn is_usable(&self) -> bool {
        !self.open.is_empty() && !self.close.is_empty()
    }
}

impl Default for ToolCallMarkers {
    fn default() -> Self {
        Self::new("<tool_call>", "</tool_call>")
    }
}

static PRESETS: Lazy<BTreeMap<&'static str, ToolCallMarkers>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    map.insert("default", ToolCallMarkers::default());
    // Hermes / Qwen / Groq tool-use fine-tunes
    map.insert("hermes", ToolCallMarkers::default());
    map.insert(
        "function_call",
        ToolCallMarkers::new("<function_call>", "</function_call>"),
    );
    map
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_presets() {
        assert_eq!(ToolCallMarkers::named("Hermes"), Some(ToolCallMarkers::default()));
        assert_eq!(
            ToolCallMarkers::named("function_call").unwrap().open,
            "<function_call>"
        );
        assert!(ToolCallMarkers::named("unknown").is_none());
        assert_eq!(
            ToolCallMarkers::preset_names(),
            vec!["default", "function_call", "hermes"]
        );
    }

    #[test]
    fn test_usable() {
        assert!(ToolCallMarkers::default().is_usable());
        assert!(!ToolCallMarkers::new("", "</x>").is_usable());
    }
}

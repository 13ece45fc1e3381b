//! Extraction of tool calls from free-form model output
//!
//! The wire format inside model text:
//!
//! ```text
//! I'll check the weather for you.
//! <tool_call>{"name": "get_weather", "arguments": {"city": "SF"}}</tool_call>
//! ```
//!
//! Parsing never fails: anything that isn't a well-formed call stays in the
//! residual text.

use serde_json::{Map, Value};

use super::markers::ToolCallMarkers;
use crate::types::{Arguments, ParsedOutput, ToolCall};

/// Finds the first well-formed tool call in model text
#[derive(Debug, Clone, Default)]
pub struct ToolCallParser {
    markers: ToolCallMarkers,
}

impl ToolCallParser {
    /// Parser using the default `<tool_call>` tags
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser using custom tags
    pub fn with_markers(markers: ToolCallMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &ToolCallMarkers {
        &self.markers
    }

    /// Extract the first well-formed call from `text`
    ///
    /// The matched region is cut out of the returned text; everything else,
    /// including later markers and malformed regions, is kept verbatim apart
    /// from trimming the ends.
    pub fn parse(&self, text: &str) -> ParsedOutput {
        let open = self.markers.open.as_str();
        let close = self.markers.close.as_str();
        if !self.markers.is_usable() {
            return ParsedOutput::text_only(text.trim());
        }

        let mut search_from = 0;
        while let Some(rel) = text[search_from..].find(open) {
            let open_at = search_from + rel;
            let payload_start = open_at + open.len();

            // Truncated generation: no closing tag anywhere after this point
            if !text[payload_start..].contains(close) {
                break;
            }

            // A string argument may itself contain the closing tag, so try each
            // closing tag in turn until the payload decodes
            let mut close_from = payload_start;
            while let Some(rel) = text[close_from..].find(close) {
                let close_at = close_from + rel;
                let region_end = close_at + close.len();

                if let Some(call) = decode_payload(&text[payload_start..close_at]) {
                    let mut residual = String::with_capacity(text.len() - (region_end - open_at));
                    residual.push_str(&text[..open_at]);
                    residual.push_str(&text[region_end..]);
                    return ParsedOutput {
                        tool_call: Some(call),
                        text: residual.trim().to_string(),
                    };
                }
                close_from = region_end;
            }

            // Malformed payload; an opening tag nested inside it may still start a good call
            search_from = payload_start;
        }

        ParsedOutput::text_only(text.trim())
    }

    /// Whether `text` contains an opening tag (complete or not)
    pub fn contains_marker(&self, text: &str) -> bool {
        self.markers.is_usable() && text.contains(self.markers.open.as_str())
    }

    /// Render a call in this parser's wire format
    pub fn render(&self, call: &ToolCall) -> String {
        let payload = serde_json::json!({
            "name": call.tool_name,
            "arguments": Value::Object(call.arguments.clone()),
        });
        format!("{}{}{}", self.markers.open, payload, self.markers.close)
    }
}

/// Parse `text` with the default tags
pub fn parse_tool_call(text: &str) -> ParsedOutput {
    ToolCallParser::new().parse(text)
}

fn decode_payload(raw: &str) -> Option<ToolCall> {
    let body = strip_code_fence(raw.trim());
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    let name = object.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let arguments = match object.get("arguments").or_else(|| object.get("parameters")) {
        None | Some(Value::Null) => Arguments::new(),
        Some(Value::Object(map)) => map.clone(),
        // OpenAI-style: arguments serialized as a JSON string
        Some(Value::String(encoded)) => decode_object(encoded)?,
        Some(_) => return None,
    };

    Some(ToolCall::new(name, arguments))
}

fn decode_object(encoded: &str) -> Option<Map<String, Value>> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Some(Map::new());
    }
    match serde_json::from_str::<Value>(trimmed).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Remove a surrounding Markdown code fence such as ```json ... ```
fn strip_code_fence(body: &str) -> &str {
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return body;
    };
    // Drop the language tag on the opening fence line
    match inner.find('\n') {
        Some(newline) if !inner[..newline].trim_start().starts_with('{') => inner[newline + 1..].trim(),
        _ => inner.trim(),
    }
}

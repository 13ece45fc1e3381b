//! Model-facing text: the tool description and tool responses

use serde_json::{json, Value};

use crate::parser::ToolCallMarkers;
use crate::types::{ToolResult, ToolSchema};

/// Build the system message describing the exposed tools
///
/// Returns `None` when there is neither a tool nor a preamble to send.
pub fn render_system_prompt(
    schemas: &[ToolSchema],
    markers: &ToolCallMarkers,
    preamble: Option<&str>,
) -> Option<String> {
    let preamble = preamble.map(str::trim).filter(|p| !p.is_empty());
    if schemas.is_empty() {
        return preamble.map(str::to_string);
    }

    let tools: Vec<String> = schemas.iter().map(|s| s.to_model_json().to_string()).collect();

    let mut prompt = String::new();
    if let Some(preamble) = preamble {
        prompt.push_str(preamble);
        prompt.push_str("\n\n");
    }
    prompt.push_str(&format!(
        "You are provided with function signatures within <tools></tools> XML tags. \
You may call one function at a time to assist with the user query. \
Don't make assumptions about what values to plug into functions. \
To call a function, return a JSON object with the function name and arguments within {open}{close} tags:\n\
{open}\n{{\"name\": <function-name>, \"arguments\": <args-json-object>}}\n{close}\n\
Results are returned within <tool_response></tool_response> tags. \
Answer the user directly once no further call is needed.\n\n\
<tools>\n{tools}\n</tools>",
        open = markers.open,
        close = markers.close,
        tools = tools.join("\n"),
    ));
    Some(prompt)
}

/// Render a tool result as fed back into the model context
pub fn render_tool_response(result: &ToolResult) -> String {
    let mut body = json!({
        "name": result.tool_name,
        "success": result.success,
    });
    if let Value::Object(ref mut map) = body {
        if result.success {
            map.insert(
                "result".to_string(),
                Value::Object(result.result.clone().unwrap_or_default()),
            );
        } else {
            map.insert(
                "error".to_string(),
                Value::String(result.error.clone().unwrap_or_default()),
            );
        }
    }
    format!("<tool_response>\n{}\n</tool_response>", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Arguments, ToolParameter};

    #[test]
    fn test_system_prompt_lists_tools_inside_tags() {
        let schemas = vec![
            ToolSchema::new("get_weather", "Weather lookup")
                .with_parameter(ToolParameter::string("city", "City").required()),
            ToolSchema::new("get_time", "Current time"),
        ];
        let prompt = render_system_prompt(&schemas, &ToolCallMarkers::default(), None).unwrap();

        // The instructions mention the empty tag pair; the listing is the last block
        let tools_start = prompt.rfind("<tools>\n").unwrap();
        let tools_end = prompt.rfind("</tools>").unwrap();
        assert!(tools_start < tools_end);
        let tools = &prompt[tools_start..tools_end];
        assert!(tools.contains("\"get_weather\""));
        assert!(tools.contains("\"get_time\""));
        assert!(tools.contains("\"required\":[\"city\"]"));
        assert!(prompt.contains("<tool_call>"));
    }

    #[test]
    fn test_system_prompt_uses_configured_markers_and_preamble() {
        let markers = ToolCallMarkers::named("function_call").unwrap();
        let prompt = render_system_prompt(
            &[ToolSchema::new("get_time", "")],
            &markers,
            Some("You are a helpful assistant."),
        )
        .unwrap();

        assert!(prompt.starts_with("You are a helpful assistant."));
        assert!(prompt.contains("<function_call>"));
        assert!(!prompt.contains("<tool_call>"));
    }

    #[test]
    fn test_no_tools_no_preamble_means_no_system_message() {
        assert!(render_system_prompt(&[], &ToolCallMarkers::default(), None).is_none());
        assert!(render_system_prompt(&[], &ToolCallMarkers::default(), Some("  ")).is_none());
        assert_eq!(
            render_system_prompt(&[], &ToolCallMarkers::default(), Some("Be brief.")).as_deref(),
            Some("Be brief.")
        );
    }

    #[test]
    fn test_tool_response_shapes() {
        let mut payload = Arguments::new();
        payload.insert("temperature".into(), json!(21));
        let ok = render_tool_response(&ToolResult::success("get_weather", payload));
        assert!(ok.starts_with("<tool_response>"));
        assert!(ok.contains("\"success\":true"));
        assert!(ok.contains("\"temperature\":21"));
        assert!(!ok.contains("\"error\""));

        let failed = render_tool_response(&ToolResult::failure("get_weather", "boom"));
        assert!(failed.contains("\"success\":false"));
        assert!(failed.contains("\"error\":\"boom\""));
        assert!(!failed.contains("\"result\""));
    }
}

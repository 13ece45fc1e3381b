//! Provider backed by a host-supplied async function
//!
//! Hosts that already talk to a model hand the whole request to a closure
//! and return the reply as JSON:
//!
//! - a string: the completion text
//! - `null`: an empty completion
//! - `{ "text": "...", "toolCall": { "toolName": "...", "arguments": {} } }`:
//!   text and/or a native tool call

use std::future::Future;

use async_trait::async_trait;
use futures::stream;
use serde_json::Value;

use super::error::{ProviderError, ProviderResult};
use super::traits::{GenerateOptions, Provider, StreamResponse};
use crate::log_debug;
use crate::logging::{Logger, SharedLogger};
use crate::types::{CancellationToken, ChatMessage, StreamChunk, ToolCall};

/// Turns a closure `(messages, options) -> Future<Output = ProviderResult<Value>>`
/// into a `Provider`
pub struct CallbackProvider<F> {
    name: String,
    func: F,
    logger: SharedLogger,
}

impl<F> CallbackProvider<F> {
    pub fn new(name: impl Into<String>, func: F, logger: SharedLogger) -> Self {
        Self {
            name: name.into(),
            func,
            logger,
        }
    }
}

#[async_trait]
impl<F, Fut> Provider for CallbackProvider<F>
where
    F: Fn(Vec<ChatMessage>, GenerateOptions) -> Fut + Send + Sync,
    Fut: Future<Output = ProviderResult<Value>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        options: GenerateOptions,
        cancel_token: CancellationToken,
    ) -> ProviderResult<StreamResponse> {
        log_debug!(
            self.logger,
            "CallbackProvider({}): {} message(s)",
            self.name,
            messages.len()
        );

        let reply = match cancel_token.run((self.func)(messages, options)).await {
            Some(reply) => reply?,
            None => return Err(ProviderError::Cancelled),
        };
        let chunks = chunks_from_reply(&self.name, reply)?;
        Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok))))
    }
}

/// Interpret a host reply as stream chunks
pub fn chunks_from_reply(provider: &str, reply: Value) -> ProviderResult<Vec<StreamChunk>> {
    match reply {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => Ok(vec![StreamChunk::text(text)]),
        Value::Object(mut map) => {
            let mut chunks = Vec::new();
            match map.remove("text") {
                None | Some(Value::Null) => {}
                Some(Value::String(text)) => chunks.push(StreamChunk::text(text)),
                Some(other) => {
                    return Err(ProviderError::invalid_response(
                        provider,
                        format!("text should be a string, got {}", other),
                    ))
                }
            }
            match map.remove("toolCall") {
                None | Some(Value::Null) => {}
                Some(call) => {
                    let call: ToolCall = serde_json::from_value(call).map_err(|e| {
                        ProviderError::invalid_response(provider, format!("bad toolCall: {}", e))
                    })?;
                    chunks.push(StreamChunk::tool_call(call));
                }
            }
            Ok(chunks)
        }
        other => Err(ProviderError::invalid_response(
            provider,
            format!("expected a string or an object, got {}", other),
        )),
    }
}

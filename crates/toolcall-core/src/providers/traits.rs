//! Provider trait definition
//!
//! The model is a black box to the orchestrator: messages go in, a stream
//! of chunks comes out.

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::types::{CancellationToken, ChatMessage, StreamChunk};
use super::error::ProviderResult;

/// Generation options forwarded to the model untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }
}

/// Type alias for the streaming response
pub type StreamResponse = Pin<Box<dyn Stream<Item = ProviderResult<StreamChunk>> + Send>>;

/// A text-generation backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name used in logs and errors
    fn name(&self) -> &str;

    /// Stream a completion for `messages`
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        options: GenerateOptions,
        cancel_token: CancellationToken,
    ) -> ProviderResult<StreamResponse>;
}

//! Mock provider for testing
//!
//! Provides deterministic, configurable responses without a model.
//! Useful for orchestrator tests, host bindings and demos.

use async_trait::async_trait;
use futures::{stream, StreamExt};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::{ProviderError, ProviderResult};
use super::traits::{GenerateOptions, Provider, StreamResponse};
use crate::log_debug;
use crate::logging::{Logger, SharedLogger};
use crate::types::{CancellationToken, ChatMessage, MessageRole, StreamChunk, ToolCall};

/// One scripted model turn
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Plain generated text (may contain tool-call markup)
    Text(String),
    /// A structured call, as a model with native function calling would emit
    Native(ToolCall),
    /// The model invocation fails
    Error(String),
}

impl From<&str> for MockReply {
    fn from(text: &str) -> Self {
        MockReply::Text(text.to_string())
    }
}

impl From<String> for MockReply {
    fn from(text: String) -> Self {
        MockReply::Text(text)
    }
}

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user message
    #[default]
    Echo,
    /// Return the same response every time
    Fixed(String),
    /// Return the n-th reply on the n-th request; the last reply repeats
    Script(Vec<MockReply>),
    /// Fail every request
    Error(String),
}

/// Configuration for the mock provider
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Response mode
    pub mode: MockMode,
    /// Delay between chunks in milliseconds (0 = no delay)
    pub chunk_delay_ms: u64,
    /// Size of each text chunk in characters (0 = single chunk)
    pub chunk_size: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            mode: MockMode::Echo,
            chunk_delay_ms: 0,
            chunk_size: 10,
        }
    }
}

/// A request the mock received
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub messages: Vec<ChatMessage>,
    pub options: GenerateOptions,
}

/// Mock LLM provider for testing
pub struct MockProvider {
    config: MockConfig,
    calls: AtomicUsize,
    requests: Mutex<Vec<MockRequest>>,
    logger: SharedLogger,
}

impl MockProvider {
    /// Create with specific config
    pub fn with_config(config: MockConfig, logger: SharedLogger) -> Self {
        Self {
            config,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Create an echo provider (echoes back user message)
    pub fn echo(logger: SharedLogger) -> Self {
        Self::with_mode(MockMode::Echo, logger)
    }

    /// Create a fixed response provider
    pub fn fixed(response: impl Into<String>, logger: SharedLogger) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()), logger)
    }

    /// Create a provider replaying `replies` in order
    pub fn scripted<R: Into<MockReply>>(
        replies: impl IntoIterator<Item = R>,
        logger: SharedLogger,
    ) -> Self {
        Self::with_mode(
            MockMode::Script(replies.into_iter().map(Into::into).collect()),
            logger,
        )
    }

    /// Create an error-producing provider
    pub fn error(message: impl Into<String>, logger: SharedLogger) -> Self {
        Self::with_mode(MockMode::Error(message.into()), logger)
    }

    fn with_mode(mode: MockMode, logger: SharedLogger) -> Self {
        Self::with_config(
            MockConfig {
                mode,
                ..Default::default()
            },
            logger,
        )
    }

    /// Set chunk delay
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.config.chunk_delay_ms = delay_ms;
        self
    }

    /// Set chunk size for splitting responses
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Number of requests served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    fn last_user_message(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User && !m.content.is_empty())
            .map(|m| m.content.clone())
            .unwrap_or_else(|| "Hello from MockProvider!".to_string())
    }

    fn split_into_chunks(&self, text: &str) -> Vec<String> {
        if self.config.chunk_size == 0 || text.is_empty() {
            return vec![text.to_string()];
        }

        text.chars()
            .collect::<Vec<_>>()
            .chunks(self.config.chunk_size)
            .map(|c| c.iter().collect())
            .collect()
    }

    fn reply_for(&self, index: usize, messages: &[ChatMessage]) -> MockReply {
        match &self.config.mode {
            MockMode::Echo => MockReply::Text(format!("Echo: {}", Self::last_user_message(messages))),
            MockMode::Fixed(response) => MockReply::Text(response.clone()),
            MockMode::Script(replies) => replies
                .get(index)
                .or_else(|| replies.last())
                .cloned()
                .unwrap_or_else(|| MockReply::Text(String::new())),
            MockMode::Error(message) => MockReply::Error(message.clone()),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        options: GenerateOptions,
        cancel_token: CancellationToken,
    ) -> ProviderResult<StreamResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply_for(index, &messages);
        log_debug!(self.logger, "MockProvider: request {} -> {:?}", index, reply);
        self.requests.lock().push(MockRequest { messages, options });

        let chunks: Vec<StreamChunk> = match reply {
            MockReply::Error(message) => {
                return Err(ProviderError::backend("mock", message));
            }
            MockReply::Native(call) => vec![StreamChunk::tool_call(call)],
            MockReply::Text(text) => self
                .split_into_chunks(&text)
                .into_iter()
                .map(StreamChunk::text)
                .collect(),
        };

        let delay_ms = self.config.chunk_delay_ms;
        let stream = stream::iter(chunks.into_iter().enumerate()).then(move |(i, chunk)| {
            let cancel = cancel_token.clone();
            async move {
                if i > 0 && delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                if cancel.is_cancelled() {
                    return Err(ProviderError::Cancelled);
                }
                Ok(chunk)
            }
        });

        Ok(Box::pin(stream))
    }
}

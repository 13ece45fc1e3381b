//! The tool-calling loop
//!
//! One `generate_with_tools` call runs rounds of: ask the model, look for a
//! tool call, execute it, feed the result back. It stops when the model
//! answers without a call, when the round budget runs out, or when
//! automatic execution is off.

use std::sync::Arc;

use futures::StreamExt;

use super::config::ToolCallingConfig;
use super::error::{OrchestratorError, OrchestratorResult};
use super::prompt::{render_system_prompt, render_tool_response};
use super::state::OrchestratorState;
use crate::logging::{Logger, SharedLogger};
use crate::{log_debug, log_error, log_info, log_warn};
use crate::parser::{ToolCallMarkers, ToolCallParser};
use crate::providers::{GenerateOptions, Provider, ProviderResult};
use crate::tools::{ToolExecutor, ToolRegistry};
use crate::types::{
    CancellationToken, ChatMessage, ParsedOutput, StreamChunk, ToolCall, ToolCallingResult,
};

/// Everything one model round produced
#[derive(Debug, Default)]
struct ModelOutput {
    text: String,
    /// First structured call, from providers with native function calling
    native_call: Option<ToolCall>,
}

/// Drives prompt -> model -> tool -> model rounds
pub struct ToolOrchestrator {
    provider: Arc<dyn Provider>,
    registry: Arc<ToolRegistry>,
    executor: ToolExecutor,
    parser: ToolCallParser,
    logger: SharedLogger,
}

impl ToolOrchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        registry: Arc<ToolRegistry>,
        logger: SharedLogger,
    ) -> Self {
        Self {
            provider,
            registry,
            executor: ToolExecutor::new(logger.clone()),
            parser: ToolCallParser::new(),
            logger,
        }
    }

    /// Use a different tool-call tag convention
    pub fn with_markers(mut self, markers: ToolCallMarkers) -> Self {
        self.parser = ToolCallParser::with_markers(markers);
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn parser(&self) -> &ToolCallParser {
        &self.parser
    }

    /// Parse model text with this orchestrator's markers
    pub fn parse_tool_call(&self, text: &str) -> ParsedOutput {
        self.parser.parse(text)
    }

    /// Run the loop for `prompt`
    pub async fn generate_with_tools(
        &self,
        prompt: &str,
        config: &ToolCallingConfig,
    ) -> OrchestratorResult<ToolCallingResult> {
        self.generate_with_tools_cancellable(prompt, config, CancellationToken::new())
            .await
    }

    /// Run the loop for `prompt`, giving up as soon as `cancel` fires
    ///
    /// Cancellation abandons the in-flight model request or tool call; the
    /// registry is never touched by an orchestration.
    pub async fn generate_with_tools_cancellable(
        &self,
        prompt: &str,
        config: &ToolCallingConfig,
        cancel: CancellationToken,
    ) -> OrchestratorResult<ToolCallingResult> {
        let filter = config.filter();
        let schemas = self.registry.schemas_matching(&filter);
        let options = config.generate_options();

        let mut messages = Vec::new();
        if let Some(system) =
            render_system_prompt(&schemas, self.parser.markers(), config.system_prompt.as_deref())
        {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        log_info!(
            self.logger,
            "[Orchestrator] Starting with {} tool(s), budget {}, autoExecute {}",
            schemas.len(),
            config.max_tool_calls,
            config.auto_execute
        );

        let mut state = OrchestratorState::Idle;
        let mut budget = config.max_tool_calls;
        let mut result = ToolCallingResult::default();

        let final_text = loop {
            if cancel.is_cancelled() {
                return Err(self.cancelled(state));
            }

            self.transition(&mut state, OrchestratorState::AwaitingModelOutput);
            let output = self.invoke_model(&messages, &options, &cancel).await?;

            self.transition(&mut state, OrchestratorState::ParsingCall);
            let (call, residual, assistant_turn) = match output.native_call {
                Some(call) => {
                    let turn = format!("{}\n{}", output.text.trim(), self.parser.render(&call));
                    (Some(call), output.text.trim().to_string(), turn.trim().to_string())
                }
                None => {
                    let parsed = self.parser.parse(&output.text);
                    (parsed.tool_call, parsed.text, output.text)
                }
            };

            let call = match call {
                None => break residual,
                Some(call) if budget == 0 => {
                    log_warn!(
                        self.logger,
                        "[Orchestrator] Tool budget exhausted, not running {}",
                        call.tool_name
                    );
                    break residual;
                }
                Some(call) if !config.auto_execute => {
                    log_debug!(
                        self.logger,
                        "[Orchestrator] autoExecute off, returning proposed call {}",
                        call.tool_name
                    );
                    result.tool_calls.push(call);
                    break residual;
                }
                Some(call) => call,
            };

            self.transition(&mut state, OrchestratorState::ExecutingTool);
            let tool_result = match cancel
                .run(self.executor.run_call(&self.registry, &filter, &call))
                .await
            {
                Some(tool_result) => tool_result,
                None => return Err(self.cancelled(state)),
            };

            messages.push(ChatMessage::assistant(assistant_turn));
            messages.push(ChatMessage::tool(render_tool_response(&tool_result)));
            result.tool_calls.push(call);
            result.tool_results.push(tool_result);
            budget -= 1;
        };

        self.transition(&mut state, OrchestratorState::Finalizing);
        result.text = final_text;
        log_info!(
            self.logger,
            "[Orchestrator] Finished: {} call(s), {} succeeded",
            result.tool_calls.len(),
            result.successful_calls()
        );
        self.transition(&mut state, OrchestratorState::Idle);

        Ok(result)
    }

    /// One model round: collect the streamed text and any native call
    async fn invoke_model(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<ModelOutput> {
        let round = async {
            let mut stream = self
                .provider
                .stream_chat(messages.to_vec(), options.clone(), cancel.clone())
                .await?;

            let mut output = ModelOutput::default();
            while let Some(chunk) = stream.next().await {
                match chunk? {
                    StreamChunk::Text { text } => output.text.push_str(&text),
                    StreamChunk::ToolCall { tool_call } => {
                        if output.native_call.is_none() {
                            output.native_call = Some(tool_call);
                        } else {
                            log_debug!(
                                self.logger,
                                "[Orchestrator] Ignoring extra native call {}",
                                tool_call.tool_name
                            );
                        }
                    }
                }
            }
            ProviderResult::Ok(output)
        };

        match cancel.run(round).await {
            Some(Ok(output)) => Ok(output),
            Some(Err(e)) => {
                log_error!(
                    self.logger,
                    "[Orchestrator] Model '{}' failed: {}",
                    self.provider.name(),
                    e
                );
                Err(e.into())
            }
            None => Err(OrchestratorError::Cancelled),
        }
    }

    fn transition(&self, state: &mut OrchestratorState, next: OrchestratorState) {
        debug_assert!(
            state.can_transition_to(next),
            "illegal transition {} -> {}",
            state,
            next
        );
        log_debug!(self.logger, "[Orchestrator] {} -> {}", state, next);
        *state = next;
    }

    fn cancelled(&self, state: OrchestratorState) -> OrchestratorError {
        log_info!(self.logger, "[Orchestrator] Cancelled while {}", state);
        OrchestratorError::Cancelled
    }
}

impl std::fmt::Debug for ToolOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolOrchestrator")
            .field("provider", &self.provider.name())
            .field("registry", &self.registry)
            .field("markers", self.parser.markers())
            .finish()
    }
}

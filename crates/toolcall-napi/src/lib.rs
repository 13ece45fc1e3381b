//! Node.js bindings for toolcall via napi-rs

#![deny(clippy::all)]

use async_trait::async_trait;
use napi::bindgen_prelude::*;
use napi::threadsafe_function::{ErrorStrategy, ThreadSafeCallContext, ThreadsafeFunction};
use napi::{Env, JsFunction, JsUnknown};
use napi_derive::napi;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use toolcall_core::config::{ConfigResolver, DefaultSettings};
use toolcall_core::logging::{FileLogger, SharedLogger};
use toolcall_core::orchestrator::{resolve_markers, ToolCallingConfig, ToolOrchestrator};
use toolcall_core::parser::ToolCallParser;
use toolcall_core::providers::{
    CallbackProvider, GenerateOptions, MockProvider, Provider, ProviderError, ProviderResult,
};
use toolcall_core::tools::{
    arguments_from_value, ToolError, ToolHandler, ToolHandlerResult, ToolRegistry,
};
use toolcall_core::types::{
    Arguments, CancellationToken as CoreCancellationToken, ChatMessage,
    ParsedOutput as CoreParsedOutput,
    ToolCall as CoreToolCall, ToolCallingResult as CoreToolCallingResult,
    ToolResult as CoreToolResult, ToolSchema,
};

fn to_napi_error(err: impl std::fmt::Display) -> Error {
    Error::from_reason(err.to_string())
}

// ============================================================================
// Result Types
// ============================================================================

#[napi(object)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: Value,
}

impl From<CoreToolCall> for ToolCall {
    fn from(call: CoreToolCall) -> Self {
        Self {
            tool_name: call.tool_name,
            arguments: Value::Object(call.arguments),
        }
    }
}

#[napi(object)]
pub struct ToolResult {
    pub tool_name: String,
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl From<CoreToolResult> for ToolResult {
    fn from(result: CoreToolResult) -> Self {
        Self {
            tool_name: result.tool_name,
            success: result.success,
            result: result.result.map(Value::Object),
            error: result.error,
        }
    }
}

#[napi(object)]
pub struct ToolCallingResult {
    /// Final model text
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    /// Parallel-indexed with `toolCalls` when calls were executed
    pub tool_results: Vec<ToolResult>,
}

impl From<CoreToolCallingResult> for ToolCallingResult {
    fn from(result: CoreToolCallingResult) -> Self {
        Self {
            text: result.text,
            tool_calls: result.tool_calls.into_iter().map(Into::into).collect(),
            tool_results: result.tool_results.into_iter().map(Into::into).collect(),
        }
    }
}

#[napi(object)]
pub struct ParsedOutput {
    pub tool_call: Option<ToolCall>,
    /// Text with the tool-call markup removed
    pub text: String,
}

impl From<CoreParsedOutput> for ParsedOutput {
    fn from(parsed: CoreParsedOutput) -> Self {
        Self {
            tool_call: parsed.tool_call.map(Into::into),
            text: parsed.text,
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Per-request settings for `generateWithTools`
#[napi(object)]
pub struct GenerateConfig {
    /// Tool schemas to expose; omitted or empty exposes every registered tool
    pub tools: Option<Vec<Value>>,
    pub max_tool_calls: Option<u32>,
    pub auto_execute: Option<bool>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl GenerateConfig {
    /// Lay these settings over `base`
    fn apply(self, mut base: ToolCallingConfig) -> Result<ToolCallingConfig> {
        if let Some(tools) = self.tools {
            base.tools = tools
                .into_iter()
                .map(serde_json::from_value::<ToolSchema>)
                .collect::<std::result::Result<_, _>>()
                .map_err(to_napi_error)?;
        }
        if let Some(max) = self.max_tool_calls {
            base.max_tool_calls = max;
        }
        if let Some(auto_execute) = self.auto_execute {
            base.auto_execute = auto_execute;
        }
        if let Some(temperature) = self.temperature {
            base.temperature = Some(temperature as f32);
        }
        if let Some(max_tokens) = self.max_tokens {
            base.max_tokens = Some(max_tokens);
        }
        if let Some(prompt) = self.system_prompt {
            base.system_prompt = Some(prompt);
        }
        Ok(base)
    }
}

/// How an engine is set up
#[napi(object)]
pub struct EngineOptions {
    /// Read defaults from the user and workspace YAML config
    pub use_config_files: Option<bool>,
    /// Workspace root for `.config/toolcall/config.yaml`
    pub workspace_path: Option<String>,
    /// Marker preset name (`hermes`, `function_call`, ...); overrides config
    pub markers: Option<String>,
}

// ============================================================================
// JS Callbacks
// ============================================================================

/// Wraps a JS function so every call returns a Promise that resolves to
/// `{ ok: value }` or `{ error: message }`, whether the function returned,
/// threw, resolved or rejected. `undefined` is reported as `null`.
const PROMISE_SHIM: &str = r#"(function (fn) {
  return function () {
    var args = arguments;
    return new Promise(function (resolve) { resolve(fn.apply(null, args)); }).then(
      function (value) { return { ok: value === undefined ? null : value }; },
      function (err) { return { error: err instanceof Error ? err.message : String(err) }; }
    );
  };
})"#;

fn promise_returning(env: &Env, func: JsFunction) -> Result<JsFunction> {
    let shim = JsFunction::try_from(env.run_script::<_, JsUnknown>(PROMISE_SHIM)?)?;
    JsFunction::try_from(shim.call(None, &[func])?)
}

/// Unpack a settled `{ ok }` / `{ error }` envelope
fn settled(envelope: Value) -> std::result::Result<Value, String> {
    match envelope {
        Value::Object(mut map) => match map.remove("error") {
            Some(Value::String(reason)) => Err(reason),
            Some(other) => Err(other.to_string()),
            None => Ok(map.remove("ok").unwrap_or(Value::Null)),
        },
        other => Ok(other),
    }
}

/// A JavaScript tool executor `(args) => object | Promise<object>`
type JsExecutor = ThreadsafeFunction<Value, ErrorStrategy::Fatal>;

/// A JavaScript model `(messages, options) => reply | Promise<reply>`
type JsModel = ThreadsafeFunction<(Value, Value), ErrorStrategy::Fatal>;

fn js_executor(env: &Env, executor: JsFunction) -> Result<JsExecutor> {
    let mut tsfn: JsExecutor = promise_returning(env, executor)?
        .create_threadsafe_function(0, |ctx: ThreadSafeCallContext<Value>| Ok(vec![ctx.value]))?;
    tsfn.unref(env)?;
    Ok(tsfn)
}

fn js_model(env: &Env, model: JsFunction) -> Result<JsModel> {
    let mut tsfn: JsModel = promise_returning(env, model)?.create_threadsafe_function(
        0,
        |ctx: ThreadSafeCallContext<(Value, Value)>| {
            let (messages, options) = ctx.value;
            Ok(vec![messages, options])
        },
    )?;
    tsfn.unref(env)?;
    Ok(tsfn)
}

struct JsToolHandler {
    name: String,
    callback: JsExecutor,
}

#[async_trait]
impl ToolHandler for JsToolHandler {
    async fn call(&self, arguments: Arguments) -> ToolHandlerResult<Arguments> {
        let promise: Promise<Value> = self
            .callback
            .call_async(Value::Object(arguments))
            .await
            .map_err(|e| ToolError::new(e.reason))?;
        let envelope = promise.await.map_err(|e| ToolError::new(e.reason))?;
        arguments_from_value(&self.name, settled(envelope).map_err(ToolError::new)?)
    }
}

async fn ask_js_model(
    model: Arc<JsModel>,
    messages: Vec<ChatMessage>,
    options: GenerateOptions,
) -> ProviderResult<Value> {
    let request = (serde_json::to_value(&messages)?, serde_json::to_value(&options)?);
    let promise: Promise<Value> = model
        .call_async(request)
        .await
        .map_err(|e| ProviderError::backend("js", e.reason))?;
    let envelope = promise
        .await
        .map_err(|e| ProviderError::backend("js", e.reason))?;
    settled(envelope).map_err(|reason| ProviderError::backend("js", reason))
}

// ============================================================================
// ToolCallingEngine
// ============================================================================

/// Registry + model + orchestrator, as used by a host application
#[napi]
pub struct ToolCallingEngine {
    registry: Arc<ToolRegistry>,
    orchestrator: ToolOrchestrator,
    defaults: DefaultSettings,
    cancel_token: Mutex<CoreCancellationToken>,
}

#[napi]
impl ToolCallingEngine {
    /// Engine whose model echoes the prompt back
    #[napi(factory)]
    pub fn echo(options: Option<EngineOptions>) -> Result<Self> {
        let provider = MockProvider::echo(Arc::new(FileLogger::new("mock")));
        Self::build(Arc::new(provider), options)
    }

    /// Engine whose model always answers `response`
    #[napi(factory)]
    pub fn with_fixed(response: String, options: Option<EngineOptions>) -> Result<Self> {
        let provider = MockProvider::fixed(response, Arc::new(FileLogger::new("mock")));
        Self::build(Arc::new(provider), options)
    }

    /// Engine whose model replays `replies`, one per round
    #[napi(factory)]
    pub fn with_script(replies: Vec<String>, options: Option<EngineOptions>) -> Result<Self> {
        let provider = MockProvider::scripted(replies, Arc::new(FileLogger::new("mock")));
        Self::build(Arc::new(provider), options)
    }

    /// Engine backed by a JavaScript model callback
    ///
    /// The callback receives the chat messages and generation options and
    /// returns (or resolves to) a string, `null`, or
    /// `{ text?, toolCall?: { toolName, arguments } }`. A throw or rejection
    /// fails `generateWithTools`.
    #[napi(factory)]
    pub fn with_model(
        env: Env,
        #[napi(
            ts_arg_type = "(messages: Array<{ role: string, content: string }>, options: { temperature?: number, maxTokens?: number, stop?: string[] }) => unknown"
        )]
        model: JsFunction,
        options: Option<EngineOptions>,
    ) -> Result<Self> {
        let model = Arc::new(js_model(&env, model)?);
        let provider = CallbackProvider::new(
            "js",
            move |messages: Vec<ChatMessage>, options: GenerateOptions| {
                ask_js_model(model.clone(), messages, options)
            },
            Arc::new(FileLogger::new("model")),
        );
        Self::build(Arc::new(provider), options)
    }

    fn build(provider: Arc<dyn Provider>, options: Option<EngineOptions>) -> Result<Self> {
        let options = options.unwrap_or(EngineOptions {
            use_config_files: None,
            workspace_path: None,
            markers: None,
        });
        let logger: SharedLogger = Arc::new(FileLogger::new("orchestrator"));

        let mut defaults = if options.use_config_files.unwrap_or(false) {
            let resolver = ConfigResolver::standard(options.workspace_path.map(Into::into))
                .with_logger(logger.clone());
            let resolved = futures::executor::block_on(resolver.resolve());
            toolcall_core::info_log!("ToolCallingEngine: defaults from {:?}", resolved.sources);
            resolved.settings
        } else {
            DefaultSettings::default()
        };
        if options.markers.is_some() {
            defaults.markers = options.markers;
        }
        let markers = resolve_markers(&defaults).map_err(to_napi_error)?;

        let registry = Arc::new(ToolRegistry::new(Arc::new(FileLogger::new("registry"))));
        let orchestrator =
            ToolOrchestrator::new(provider, registry.clone(), logger).with_markers(markers);

        Ok(Self {
            registry,
            orchestrator,
            defaults,
            cancel_token: Mutex::new(CoreCancellationToken::new()),
        })
    }

    /// Register (or replace) a tool
    ///
    /// The executor may return a mapping or a Promise of one; throwing or
    /// rejecting yields a failed `ToolResult`.
    #[napi]
    pub fn register_tool(
        &self,
        env: Env,
        schema: Value,
        #[napi(
            ts_arg_type = "(args: Record<string, unknown>) => Record<string, unknown> | void | Promise<Record<string, unknown> | void>"
        )]
        executor: JsFunction,
    ) -> Result<()> {
        let schema: ToolSchema = serde_json::from_value(schema).map_err(to_napi_error)?;
        let handler = JsToolHandler {
            name: schema.name.clone(),
            callback: js_executor(&env, executor)?,
        };
        self.registry
            .register(schema, Arc::new(handler))
            .map_err(to_napi_error)
    }

    /// Remove every registered tool
    #[napi]
    pub fn clear_tools(&self) {
        self.registry.clear();
    }

    #[napi]
    pub fn tool_count(&self) -> u32 {
        self.registry.len() as u32
    }

    #[napi]
    pub fn tool_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Run the tool-calling loop for `prompt`
    ///
    /// Rejects only when the model itself fails or the run is cancelled.
    #[napi]
    pub async fn generate_with_tools(
        &self,
        prompt: String,
        config: Option<GenerateConfig>,
    ) -> Result<ToolCallingResult> {
        let base = ToolCallingConfig::from_defaults(&self.defaults);
        let config = match config {
            Some(overrides) => overrides.apply(base)?,
            None => base,
        };
        let cancel = self.cancel_token.lock().clone();

        toolcall_core::info_log!(
            "ToolCallingEngine.generateWithTools: tools={}, maxToolCalls={}",
            self.registry.len(),
            config.max_tool_calls
        );

        self.orchestrator
            .generate_with_tools_cancellable(&prompt, &config, cancel)
            .await
            .map(Into::into)
            .map_err(to_napi_error)
    }

    /// Parse model text with this engine's markers
    #[napi]
    pub fn parse_tool_call(&self, text: String) -> ParsedOutput {
        self.orchestrator.parse_tool_call(&text).into()
    }

    /// Cancel every in-flight `generateWithTools`; later calls run normally
    #[napi]
    pub fn cancel(&self) {
        let mut token = self.cancel_token.lock();
        token.cancel();
        *token = CoreCancellationToken::new();
    }
}

/// Extract the first tool call from `text` (default `<tool_call>` tags)
#[napi]
pub fn parse_tool_call(text: String, markers: Option<String>) -> Result<ParsedOutput> {
    let parser = match markers {
        Some(name) => {
            let defaults = DefaultSettings {
                markers: Some(name),
                ..Default::default()
            };
            ToolCallParser::with_markers(resolve_markers(&defaults).map_err(to_napi_error)?)
        }
        None => ToolCallParser::new(),
    };
    Ok(parser.parse(&text).into())
}

//! Orchestration errors
//!
//! Tool problems never show up here: they become failed `ToolResult`s.
//! Only a failing model invocation (or cancellation) ends an orchestration
//! abnormally.

use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The model invocation itself failed
    #[error("Model invocation failed: {0}")]
    Model(#[source] ProviderError),

    /// The caller cancelled the orchestration
    #[error("Orchestration cancelled")]
    Cancelled,
}

impl From<ProviderError> for OrchestratorError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Cancelled => OrchestratorError::Cancelled,
            other => OrchestratorError::Model(other),
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

//! Orchestrator lifecycle states

/// Where an orchestration currently is
///
/// `Idle -> AwaitingModelOutput -> ParsingCall -> (ExecutingTool -> AwaitingModelOutput)* -> Finalizing -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrchestratorState {
    #[default]
    Idle,
    AwaitingModelOutput,
    ParsingCall,
    ExecutingTool,
    Finalizing,
}

impl OrchestratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestratorState::Idle => "idle",
            OrchestratorState::AwaitingModelOutput => "awaiting_model_output",
            OrchestratorState::ParsingCall => "parsing_call",
            OrchestratorState::ExecutingTool => "executing_tool",
            OrchestratorState::Finalizing => "finalizing",
        }
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(&self, next: OrchestratorState) -> bool {
        use OrchestratorState::*;
        matches!(
            (self, next),
            (Idle, AwaitingModelOutput)
                | (AwaitingModelOutput, ParsingCall)
                | (ParsingCall, ExecutingTool)
                | (ParsingCall, Finalizing)
                | (ExecutingTool, AwaitingModelOutput)
                | (Finalizing, Idle)
        )
    }
}

impl std::fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

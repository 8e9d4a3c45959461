use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::plan::Strategy;

/// Terminal error recorded on a single call's outcome. These never cross
/// the engine boundary as an `Err`; callers read them off the outcome list.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StepError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    #[error("variable '{0}' has no published value")]
    UnresolvedVariable(String),
    #[error("tool call timed out after {0}ms")]
    Timeout(u64),
    #[error("tool execution failed: {0}")]
    ToolExecution(String),
    #[error("upstream step {0} did not succeed")]
    UpstreamFailure(u32),
    #[error("cancelled by plan deadline before starting")]
    Cancelled,
}

impl StepError {
    /// Stable tag used when outcomes are folded into aggregated output.
    pub fn kind(&self) -> &'static str {
        match self {
            StepError::UnknownTool(_) => "unknown_tool",
            StepError::UnresolvedVariable(_) => "unresolved_variable",
            StepError::Timeout(_) => "timeout",
            StepError::ToolExecution(_) => "tool_execution_error",
            StepError::UpstreamFailure(_) => "upstream_failure",
            StepError::Cancelled => "cancelled",
        }
    }
}

/// What happened to one planned call.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: u32,
    pub tool_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,
    pub duration_ms: u64,
}

impl StepOutcome {
    pub fn success(step: u32, tool_name: impl Into<String>, value: Value, duration_ms: u64) -> Self {
        Self {
            step,
            tool_name: tool_name.into(),
            success: true,
            value: Some(value),
            error: None,
            duration_ms,
        }
    }

    pub fn failure(
        step: u32,
        tool_name: impl Into<String>,
        error: StepError,
        duration_ms: u64,
    ) -> Self {
        Self {
            step,
            tool_name: tool_name.into(),
            success: false,
            value: None,
            error: Some(error),
            duration_ms,
        }
    }

    /// A call that never ran because something it depends on did not succeed.
    pub fn skipped(step: u32, tool_name: impl Into<String>, upstream: u32) -> Self {
        Self::failure(step, tool_name, StepError::UpstreamFailure(upstream), 0)
    }
}

/// Consolidated result of one plan execution.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub execution_id: String,
    pub strategy: Strategy,
    /// Sorted by ascending step regardless of completion order.
    pub outcomes: Vec<StepOutcome>,
    pub overall_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_value: Option<Value>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionResult {
    pub fn outcome(&self, step: u32) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|outcome| outcome.step == step)
    }
}

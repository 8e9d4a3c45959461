mod outcome;
mod plan;

pub use outcome::{ExecutionResult, StepError, StepOutcome};
pub use plan::{Dependency, ExecutionPlan, ParamValue, Strategy, ToolCall};

use crate::application::tooling::ProviderError;
use thiserror::Error;

/// Failures that abort an execution before any call runs. Per-call problems
/// never surface here; they are recorded as step outcomes instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("failed to enumerate provider tools: {0}")]
    Registry(#[from] ProviderError),
}

/// Plan validation failures, all detected before anything executes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("execution plan contains no calls")]
    Empty,
    #[error("step numbers must be positive")]
    ZeroStep,
    #[error("duplicate step number {0}")]
    DuplicateStep(u32),
    #[error("step {step} depends on unknown step {dependency}")]
    UnknownDependency { step: u32, dependency: u32 },
    #[error("step {0} depends on itself")]
    SelfDependency(u32),
    #[error("result variable '{variable}' is declared by both step {first} and step {second}")]
    DuplicateResultVariable {
        variable: String,
        first: u32,
        second: u32,
    },
    #[error("step {step} references variable '{variable}' that no call publishes")]
    DanglingReference { step: u32, variable: String },
    #[error("dependency cycle between steps {0:?}")]
    Cycle(Vec<u32>),
    #[error("SINGLE strategy requires exactly one call, plan declares {0}")]
    SingleCardinality(usize),
    #[error("PARALLEL strategy forbids dependencies, step {0} declares one")]
    ParallelDependency(u32),
}

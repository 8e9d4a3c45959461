pub mod application;
pub mod config;
pub mod domain;

pub use application::engine::{EngineError, PlanEngine, PlanError};
pub use application::tooling::{
    ProviderError, ProviderManager, ProviderToolInfo, ToolDescriptor, ToolProvider,
    ToolProviderRegistry,
};
pub use config::EngineConfig;
pub use domain::{
    Dependency, ExecutionPlan, ExecutionResult, ParamValue, StepError, StepOutcome, Strategy,
    ToolCall,
};

mod aggregate;
mod errors;
mod execution;
mod graph;
mod resolver;
mod store;
mod strategy;
mod validate;

pub use errors::{EngineError, PlanError};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::application::tooling::{ProviderToolInfo, ToolProviderRegistry};
use crate::config::EngineConfig;
use crate::domain::{ExecutionPlan, ExecutionResult};
use store::VariableStore;

/// Carries execution plans out against the injected provider registry.
pub struct PlanEngine {
    registry: Arc<dyn ToolProviderRegistry>,
    step_timeout: Duration,
    plan_timeout: Option<Duration>,
}

impl PlanEngine {
    pub fn new(registry: Arc<dyn ToolProviderRegistry>) -> Self {
        Self::with_config(registry, &EngineConfig::default())
    }

    pub fn with_config(registry: Arc<dyn ToolProviderRegistry>, config: &EngineConfig) -> Self {
        Self {
            registry,
            step_timeout: config.step_timeout(),
            plan_timeout: config.plan_timeout(),
        }
    }

    /// The single entry point: validate, execute per strategy, aggregate.
    ///
    /// `Err` means the plan never started (invalid plan, or the registry
    /// listing failed); every per-call failure is a recorded outcome inside
    /// the `Ok` result.
    pub async fn execute(&self, plan: &ExecutionPlan) -> Result<ExecutionResult, EngineError> {
        let execution_id = Uuid::new_v4().to_string();
        info!(
            execution_id = execution_id.as_str(),
            strategy = plan.strategy.as_str(),
            calls = plan.calls.len(),
            "Plan execution started"
        );

        let graph = validate::validate(plan)?;
        let index = ToolIndex::build(self.registry.as_ref()).await?;

        let started_at = Utc::now();
        let store = VariableStore::new();
        let outcomes = self.run_plan(plan, &graph, &index, &store).await;

        let order = graph.topological_order();
        let overall_success = outcomes.iter().all(|outcome| outcome.success);
        let final_value = aggregate::final_value(plan.strategy, &order, &plan.calls, &outcomes);

        info!(
            execution_id = execution_id.as_str(),
            overall_success, "Plan execution finished"
        );
        Ok(ExecutionResult {
            execution_id,
            strategy: plan.strategy,
            outcomes,
            overall_success,
            final_value,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Execution-time view of which provider exposes which tool. Rebuilt for
/// every execution; lookups are case-insensitive, first listing wins.
pub(crate) struct ToolIndex {
    bindings: HashMap<String, ProviderToolInfo>,
}

impl ToolIndex {
    pub async fn build(registry: &dyn ToolProviderRegistry) -> Result<Self, EngineError> {
        let mut bindings = HashMap::new();
        for info in registry.list_tools().await? {
            bindings.entry(info.tool_name.to_lowercase()).or_insert(info);
        }
        Ok(Self { bindings })
    }

    pub fn lookup(&self, tool_name: &str) -> Option<&ProviderToolInfo> {
        self.bindings.get(&tool_name.to_lowercase())
    }
}

use serde_json::Value;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::resolver::resolve_parameters;
use super::store::VariableStore;
use super::{PlanEngine, ToolIndex};
use crate::domain::{StepError, StepOutcome, ToolCall};

impl PlanEngine {
    /// Execute exactly one call: resolve, bind, invoke with a bounded
    /// timeout. The result variable is published before the outcome becomes
    /// visible, so a dependent never observes a half-published store.
    pub(crate) async fn run_step(
        &self,
        call: &ToolCall,
        index: &ToolIndex,
        store: &VariableStore,
    ) -> StepOutcome {
        let started = Instant::now();

        let arguments = match resolve_parameters(call, store) {
            Ok(arguments) => arguments,
            Err(error) => {
                warn!(step = call.step, tool = %call.tool_name, %error, "Parameter resolution failed");
                return StepOutcome::failure(call.step, &call.tool_name, error, elapsed_ms(started));
            }
        };

        let Some(binding) = index.lookup(&call.tool_name) else {
            warn!(step = call.step, requested_tool = %call.tool_name, "Unknown tool requested by plan");
            return StepOutcome::failure(
                call.step,
                &call.tool_name,
                StepError::UnknownTool(call.tool_name.clone()),
                elapsed_ms(started),
            );
        };

        debug!(
            step = call.step,
            tool = %binding.tool_name,
            provider = %binding.provider_id,
            "Dispatching tool call"
        );
        let invocation = self.registry.invoke(
            &binding.provider_id,
            &binding.tool_name,
            Value::Object(arguments),
        );

        let outcome = match timeout(self.step_timeout, invocation).await {
            Ok(Ok(value)) => {
                if let Some(variable) = call.result_variable.as_deref() {
                    store.publish(variable, value.clone());
                }
                StepOutcome::success(call.step, &call.tool_name, value, elapsed_ms(started))
            }
            Ok(Err(source)) => {
                warn!(step = call.step, tool = %call.tool_name, %source, "Tool execution failed");
                StepOutcome::failure(
                    call.step,
                    &call.tool_name,
                    StepError::ToolExecution(source.to_string()),
                    elapsed_ms(started),
                )
            }
            Err(_) => {
                let limit = self.step_timeout.as_millis() as u64;
                warn!(step = call.step, tool = %call.tool_name, timeout_ms = limit, "Tool call timed out");
                StepOutcome::failure(
                    call.step,
                    &call.tool_name,
                    StepError::Timeout(limit),
                    elapsed_ms(started),
                )
            }
        };

        info!(
            step = outcome.step,
            tool = %outcome.tool_name,
            success = outcome.success,
            "Tool call finished"
        );
        outcome
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

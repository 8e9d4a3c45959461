use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use tokio::time::Instant;
use tracing::debug;

use super::graph::DependencyGraph;
use super::store::VariableStore;
use super::{PlanEngine, ToolIndex};
use crate::domain::{ExecutionPlan, StepError, StepOutcome, Strategy, ToolCall};

impl PlanEngine {
    /// Drive the plan's calls in the shape its strategy declares. Outcomes
    /// come back sorted by ascending step regardless of completion order.
    pub(crate) async fn run_plan(
        &self,
        plan: &ExecutionPlan,
        graph: &DependencyGraph,
        index: &ToolIndex,
        store: &VariableStore,
    ) -> Vec<StepOutcome> {
        let deadline = self.plan_timeout.map(|limit| Instant::now() + limit);
        let mut outcomes = match plan.strategy {
            Strategy::Parallel => self.run_all_at_once(plan, index, store, deadline).await,
            Strategy::Single | Strategy::Sequential => {
                self.run_in_order(plan, graph, index, store, deadline).await
            }
            Strategy::Hybrid => self.run_in_layers(plan, graph, index, store, deadline).await,
        };
        outcomes.sort_by_key(|outcome| outcome.step);
        outcomes
    }

    /// All calls launched together. No fail-fast: every sibling runs to its
    /// own terminal outcome even when another one fails.
    async fn run_all_at_once(
        &self,
        plan: &ExecutionPlan,
        index: &ToolIndex,
        store: &VariableStore,
        deadline: Option<Instant>,
    ) -> Vec<StepOutcome> {
        join_all(
            plan.calls
                .iter()
                .map(|call| self.launch(call, index, store, deadline)),
        )
        .await
    }

    /// One call at a time in topological order. A failed or skipped step
    /// marks its dependents, transitively, as upstream failures; branches
    /// that do not depend on it still run.
    async fn run_in_order(
        &self,
        plan: &ExecutionPlan,
        graph: &DependencyGraph,
        index: &ToolIndex,
        store: &VariableStore,
        deadline: Option<Instant>,
    ) -> Vec<StepOutcome> {
        let calls = index_calls(plan);
        let mut failed: BTreeSet<u32> = BTreeSet::new();
        let mut outcomes = Vec::with_capacity(plan.calls.len());
        for step in graph.topological_order() {
            let call = calls[&step];
            if let Some(upstream) = first_failed_prerequisite(graph, &failed, step) {
                debug!(step, upstream, "Skipping call after upstream failure");
                failed.insert(step);
                outcomes.push(StepOutcome::skipped(step, &call.tool_name, upstream));
                continue;
            }
            let outcome = self.launch(call, index, store, deadline).await;
            if !outcome.success {
                failed.insert(step);
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Layered execution: calls within a layer run concurrently; the next
    /// layer resolves only after every call here reached a terminal state,
    /// so dependents observe all of the layer's store writes.
    async fn run_in_layers(
        &self,
        plan: &ExecutionPlan,
        graph: &DependencyGraph,
        index: &ToolIndex,
        store: &VariableStore,
        deadline: Option<Instant>,
    ) -> Vec<StepOutcome> {
        let calls = index_calls(plan);
        let mut failed: BTreeSet<u32> = BTreeSet::new();
        let mut outcomes = Vec::with_capacity(plan.calls.len());
        for layer in graph.layers() {
            let mut runnable = Vec::with_capacity(layer.len());
            for step in layer {
                let call = calls[&step];
                if let Some(upstream) = first_failed_prerequisite(graph, &failed, step) {
                    debug!(step, upstream, "Skipping call after upstream failure");
                    failed.insert(step);
                    outcomes.push(StepOutcome::skipped(step, &call.tool_name, upstream));
                } else {
                    runnable.push(call);
                }
            }

            let finished = join_all(
                runnable
                    .into_iter()
                    .map(|call| self.launch(call, index, store, deadline)),
            )
            .await;
            for outcome in finished {
                if !outcome.success {
                    failed.insert(outcome.step);
                }
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Refuse to start past the plan deadline; calls already dispatched are
    /// left to drain under their own step timeout.
    async fn launch(
        &self,
        call: &ToolCall,
        index: &ToolIndex,
        store: &VariableStore,
        deadline: Option<Instant>,
    ) -> StepOutcome {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            debug!(step = call.step, tool = %call.tool_name, "Plan deadline reached before launch");
            return StepOutcome::failure(call.step, &call.tool_name, StepError::Cancelled, 0);
        }
        self.run_step(call, index, store).await
    }
}

fn index_calls(plan: &ExecutionPlan) -> HashMap<u32, &ToolCall> {
    plan.calls.iter().map(|call| (call.step, call)).collect()
}

fn first_failed_prerequisite(
    graph: &DependencyGraph,
    failed: &BTreeSet<u32>,
    step: u32,
) -> Option<u32> {
    graph
        .prerequisites(step)
        .find(|prereq| failed.contains(prereq))
}

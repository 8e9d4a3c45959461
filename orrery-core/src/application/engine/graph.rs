use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::errors::PlanError;
use crate::domain::ExecutionPlan;

/// Union of declared `dependency` edges and the implicit edges induced by
/// variable references, checked acyclic at construction time.
#[derive(Debug)]
pub(crate) struct DependencyGraph {
    prerequisites: BTreeMap<u32, BTreeSet<u32>>,
}

impl DependencyGraph {
    pub fn build(plan: &ExecutionPlan) -> Result<Self, PlanError> {
        let steps: BTreeSet<u32> = plan.calls.iter().map(|call| call.step).collect();
        let producers: HashMap<&str, u32> = plan
            .calls
            .iter()
            .filter_map(|call| {
                call.result_variable
                    .as_deref()
                    .map(|variable| (variable, call.step))
            })
            .collect();

        let mut prerequisites: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
        for call in &plan.calls {
            let entry = prerequisites.entry(call.step).or_default();
            for &dependency in call.dependency.steps() {
                if dependency == call.step {
                    return Err(PlanError::SelfDependency(call.step));
                }
                if !steps.contains(&dependency) {
                    return Err(PlanError::UnknownDependency {
                        step: call.step,
                        dependency,
                    });
                }
                entry.insert(dependency);
            }
            for variable in call.references() {
                let Some(&producer) = producers.get(variable) else {
                    return Err(PlanError::DanglingReference {
                        step: call.step,
                        variable: variable.to_string(),
                    });
                };
                if producer == call.step {
                    return Err(PlanError::SelfDependency(call.step));
                }
                entry.insert(producer);
            }
        }

        let graph = Self { prerequisites };
        let ordered: BTreeSet<u32> = graph.topological_order().into_iter().collect();
        if ordered.len() < graph.prerequisites.len() {
            let cycle = graph
                .prerequisites
                .keys()
                .copied()
                .filter(|step| !ordered.contains(step))
                .collect();
            return Err(PlanError::Cycle(cycle));
        }
        Ok(graph)
    }

    pub fn prerequisites(&self, step: u32) -> impl Iterator<Item = u32> + '_ {
        self.prerequisites.get(&step).into_iter().flatten().copied()
    }

    /// Kahn's algorithm; ties among simultaneously eligible steps break by
    /// ascending step number. Cycle members are absent from the order.
    pub fn topological_order(&self) -> Vec<u32> {
        let (mut in_degree, dependents) = self.degrees();

        let mut ready: BTreeSet<u32> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(step, _)| *step)
            .collect();

        let mut order = Vec::with_capacity(in_degree.len());
        while let Some(&step) = ready.iter().next() {
            ready.remove(&step);
            order.push(step);
            if let Some(children) = dependents.get(&step) {
                for &child in children {
                    let degree = in_degree.get_mut(&child).expect("dependent is a known step");
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(child);
                    }
                }
            }
        }
        order
    }

    /// Level-wise layering: layer 0 has no prerequisites, layer k is
    /// satisfied entirely by layers < k. Steps within a layer ascend.
    pub fn layers(&self) -> Vec<Vec<u32>> {
        let (mut in_degree, dependents) = self.degrees();

        let mut current: Vec<u32> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(step, _)| *step)
            .collect();

        let mut layers = Vec::new();
        while !current.is_empty() {
            let mut next = BTreeSet::new();
            for &step in &current {
                if let Some(children) = dependents.get(&step) {
                    for &child in children {
                        let degree =
                            in_degree.get_mut(&child).expect("dependent is a known step");
                        *degree -= 1;
                        if *degree == 0 {
                            next.insert(child);
                        }
                    }
                }
            }
            layers.push(current);
            current = next.into_iter().collect();
        }
        layers
    }

    fn degrees(&self) -> (BTreeMap<u32, usize>, BTreeMap<u32, Vec<u32>>) {
        let in_degree = self
            .prerequisites
            .iter()
            .map(|(step, prereqs)| (*step, prereqs.len()))
            .collect();

        let mut dependents: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for (step, prereqs) in &self.prerequisites {
            for prereq in prereqs {
                dependents.entry(*prereq).or_default().push(*step);
            }
        }
        (in_degree, dependents)
    }
}

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Execution-scoped mapping from result variable to published tool result.
/// Each entry is written once by its producing call; dependents read only
/// after the coordinator's barrier, so the lock is held just for the copy.
pub(crate) struct VariableStore {
    values: Mutex<HashMap<String, Value>>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }

    pub fn publish(&self, name: &str, value: Value) {
        debug!(variable = name, "Publishing step result");
        self.values
            .lock()
            .expect("variable store lock")
            .insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.values
            .lock()
            .expect("variable store lock")
            .get(name)
            .cloned()
    }
}

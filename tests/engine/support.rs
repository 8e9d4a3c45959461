#![allow(dead_code)]

use async_trait::async_trait;
use orrery_core::{
    EngineConfig, PlanEngine, ProviderError, ProviderManager, ToolDescriptor, ToolProvider,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recording arithmetic/search provider with injectable failures and
/// delays, in the spirit of a real remote tool server.
pub struct FakeProvider {
    tools: Vec<&'static str>,
    delays: HashMap<String, Duration>,
    failures: Vec<String>,
    calls: Mutex<Vec<RecordedCall>>,
    events: Mutex<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub tool: String,
    pub arguments: Value,
}

impl FakeProvider {
    pub fn new(tools: Vec<&'static str>) -> Self {
        Self {
            tools,
            delays: HashMap::new(),
            failures: Vec::new(),
            calls: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, tool: &str) -> Self {
        self.failures.push(tool.to_string());
        self
    }

    pub fn delayed(mut self, tool: &str, delay: Duration) -> Self {
        self.delays.insert(tool.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("call log lock").clone()
    }

    pub fn invocations_of(&self, tool: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.tool == tool)
            .count()
    }

    /// start:/end: markers in the order the provider observed them.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("event log lock").clone()
    }
}

#[async_trait]
impl ToolProvider for FakeProvider {
    async fn describe_tools(&self) -> Result<Vec<ToolDescriptor>, ProviderError> {
        Ok(self
            .tools
            .iter()
            .map(|name| ToolDescriptor {
                name: name.to_string(),
                description: None,
            })
            .collect())
    }

    async fn call_tool(&self, tool: &str, arguments: Value) -> Result<Value, ProviderError> {
        self.calls.lock().expect("call log lock").push(RecordedCall {
            tool: tool.to_string(),
            arguments: arguments.clone(),
        });
        self.events
            .lock()
            .expect("event log lock")
            .push(format!("start:{tool}"));

        if let Some(delay) = self.delays.get(tool) {
            tokio::time::sleep(*delay).await;
        }

        self.events
            .lock()
            .expect("event log lock")
            .push(format!("end:{tool}"));

        if self.failures.iter().any(|name| name == tool) {
            return Err(ProviderError::Remote {
                provider: "fake".into(),
                code: -32000,
                message: format!("{tool} exploded"),
            });
        }
        evaluate(tool, &arguments)
    }
}

fn evaluate(tool: &str, arguments: &Value) -> Result<Value, ProviderError> {
    let int = |key: &str| arguments.get(key).and_then(Value::as_i64).unwrap_or_default();
    let value = match tool {
        "add" => json!(int("a") + int("b")),
        "subtract" => json!(int("a") - int("b")),
        "power" => json!(int("base").pow(int("exponent") as u32)),
        "factorial" => json!((1..=int("n")).product::<i64>()),
        "sqrt" => {
            let root = (int("n") as f64).sqrt();
            if root.fract() == 0.0 {
                json!(root as i64)
            } else {
                json!(root)
            }
        }
        "search" => json!({
            "query": arguments.get("query").cloned().unwrap_or(Value::Null),
            "hits": ["result-1", "result-2"],
        }),
        other => {
            return Err(ProviderError::InvalidArguments {
                tool: other.to_string(),
                message: "unsupported fake tool".into(),
            });
        }
    };
    Ok(value)
}

pub fn engine_with(providers: Vec<(&str, Arc<FakeProvider>)>) -> PlanEngine {
    engine_with_config(providers, EngineConfig::default())
}

pub fn engine_with_config(
    providers: Vec<(&str, Arc<FakeProvider>)>,
    config: EngineConfig,
) -> PlanEngine {
    let mut manager = ProviderManager::new();
    for (id, provider) in providers {
        manager = manager.with_provider(id, provider);
    }
    PlanEngine::with_config(Arc::new(manager), &config)
}

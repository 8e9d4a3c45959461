use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Execution strategy declared by the planning collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Strategy {
    #[serde(alias = "single")]
    Single,
    #[serde(alias = "parallel")]
    Parallel,
    #[serde(alias = "sequential")]
    Sequential,
    #[serde(alias = "hybrid")]
    Hybrid,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Single => "SINGLE",
            Strategy::Parallel => "PARALLEL",
            Strategy::Sequential => "SEQUENTIAL",
            Strategy::Hybrid => "HYBRID",
        }
    }

    /// Whether the aggregated result is a labeled collection of every
    /// outcome rather than a single terminal value.
    pub fn is_grouped(self) -> bool {
        matches!(self, Strategy::Parallel | Strategy::Hybrid)
    }
}

/// One declared parameter value: either a literal handed to the provider
/// verbatim, or a reference to another call's published result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ParamValue {
    Literal(Value),
    Reference(String),
}

impl ParamValue {
    pub fn reference(&self) -> Option<&str> {
        match self {
            ParamValue::Reference(name) => Some(name),
            ParamValue::Literal(_) => None,
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        if let Value::String(text) = &value {
            if let Some(name) = parse_marker(text) {
                return ParamValue::Reference(name.to_string());
            }
        }
        ParamValue::Literal(value)
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Literal(inner) => inner,
            ParamValue::Reference(name) => Value::String(format!("${{{name}}}")),
        }
    }
}

/// A string is a reference only when it is exactly one `${ident}` marker;
/// embedded or malformed markers stay literal text.
fn parse_marker(text: &str) -> Option<&str> {
    let name = text.strip_prefix("${")?.strip_suffix('}')?;
    let mut chars = name.chars();
    let first = chars.next()?;
    if first != '_' && !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
        Some(name)
    } else {
        None
    }
}

/// Declared prerequisite steps. Variable references add implicit edges on
/// top of these; the engine always honors the union.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    #[default]
    None,
    Single(u32),
    Many(Vec<u32>),
}

impl Dependency {
    pub fn steps(&self) -> &[u32] {
        match self {
            Dependency::None => &[],
            Dependency::Single(step) => std::slice::from_ref(step),
            Dependency::Many(steps) => steps,
        }
    }
}

/// One planned invocation of a provider tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub step: u32,
    pub tool_name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
    #[serde(default)]
    pub dependency: Dependency,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub result_variable: Option<String>,
}

impl ToolCall {
    pub fn new(step: u32, tool_name: impl Into<String>) -> Self {
        Self {
            step,
            tool_name: tool_name.into(),
            parameters: BTreeMap::new(),
            dependency: Dependency::None,
            purpose: String::new(),
            result_variable: None,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependency = dependency;
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn with_result_variable(mut self, name: impl Into<String>) -> Self {
        self.result_variable = Some(name.into());
        self
    }

    /// Variable names this call's parameters refer to.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.parameters.values().filter_map(ParamValue::reference)
    }
}

/// Immutable plan handed to the engine by the planning collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub strategy: Strategy,
    pub calls: Vec<ToolCall>,
}

impl ExecutionPlan {
    pub fn new(strategy: Strategy, calls: Vec<ToolCall>) -> Self {
        Self { strategy, calls }
    }
}

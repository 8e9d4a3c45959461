use async_trait::async_trait;
use serde_json::Value;

use super::error::ProviderError;

/// What one provider says about one of its tools.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: Option<String>,
}

/// Registry-level listing entry: a tool together with the provider that
/// exposes it.
#[derive(Debug, Clone)]
pub struct ProviderToolInfo {
    pub tool_name: String,
    pub provider_id: String,
    pub description: Option<String>,
}

/// A live connection to one remote tool provider. Transport management
/// lives behind this trait; the engine only sees the calls.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    async fn describe_tools(&self) -> Result<Vec<ToolDescriptor>, ProviderError>;

    async fn call_tool(&self, tool: &str, arguments: Value) -> Result<Value, ProviderError>;
}

/// The engine's only outward boundary: enumerate tools across providers and
/// invoke one of them.
#[async_trait]
pub trait ToolProviderRegistry: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ProviderToolInfo>, ProviderError>;

    async fn invoke(
        &self,
        provider_id: &str,
        tool_name: &str,
        arguments: Value,
    ) -> Result<Value, ProviderError>;
}

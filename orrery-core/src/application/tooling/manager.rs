use super::error::ProviderError;
use super::interface::{ProviderToolInfo, ToolProvider, ToolProviderRegistry};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Routes registry calls to injected provider handles. Registration order
/// is preserved so tool listings (and first-wins bindings) stay stable.
pub struct ProviderManager {
    providers: Vec<(String, Arc<dyn ToolProvider>)>,
}

impl ProviderManager {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with_provider(mut self, id: impl Into<String>, provider: Arc<dyn ToolProvider>) -> Self {
        self.providers.push((id.into(), provider));
        self
    }

    fn provider(&self, id: &str) -> Option<&Arc<dyn ToolProvider>> {
        self.providers
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, provider)| provider)
    }
}

impl Default for ProviderManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolProviderRegistry for ProviderManager {
    async fn list_tools(&self) -> Result<Vec<ProviderToolInfo>, ProviderError> {
        let mut listing = Vec::new();
        for (id, provider) in &self.providers {
            let tools = provider.describe_tools().await?;
            debug!(
                provider = id.as_str(),
                tools = tools.len(),
                "Collected provider tool listing"
            );
            listing.extend(tools.into_iter().map(|tool| ProviderToolInfo {
                tool_name: tool.name,
                provider_id: id.clone(),
                description: tool.description,
            }));
        }
        Ok(listing)
    }

    async fn invoke(
        &self,
        provider_id: &str,
        tool_name: &str,
        arguments: Value,
    ) -> Result<Value, ProviderError> {
        let Some(provider) = self.provider(provider_id) else {
            warn!(
                provider = provider_id,
                tool = tool_name,
                "Invoke routed to unregistered provider"
            );
            return Err(ProviderError::NotRegistered {
                provider: provider_id.to_string(),
            });
        };
        provider.call_tool(tool_name, arguments).await
    }
}

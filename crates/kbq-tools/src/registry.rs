use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::datetime::DateTimeTool;
use crate::error::ToolError;
use crate::tool::{Tool, ToolResult};

/// Tool executions are capped at this duration; a timeout is reported as a
/// failed `ToolResult`, never a handler error.
const EXECUTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Registered, named, stateless capabilities invocable by name.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// The built-in `datetime` tool, plus `web_search` when the `web-search`
    /// feature is enabled and an endpoint is configured by the caller —
    /// register it separately with [`ToolRegistry::register`] since it
    /// needs an endpoint URL.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DateTimeTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(AsRef::as_ref)
    }

    /// Invokes a registered tool, bounding its runtime to
    /// [`EXECUTION_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] if no tool is registered under
    /// `name`. A timeout or an in-tool failure surfaces as a failed
    /// `ToolResult`, not an `Err`.
    pub async fn invoke(&self, name: &str, params: Value) -> Result<ToolResult, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        match tokio::time::timeout(EXECUTION_TIMEOUT, tool.execute(params)).await {
            Ok(result) => Ok(result),
            Err(_) => {
                warn!(tool = name, "tool execution timed out");
                Ok(ToolResult::failure(format!("tool {name:?} timed out after {EXECUTION_TIMEOUT:?}")))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn datetime_is_registered_by_default() {
        let registry = ToolRegistry::with_defaults();
        let result = registry.invoke("datetime", json!({})).await.unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let registry = ToolRegistry::with_defaults();
        let result = registry.invoke("nonexistent", json!({})).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }
}

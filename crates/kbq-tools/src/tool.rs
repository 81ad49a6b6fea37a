use async_trait::async_trait;
use schemars::Schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform outcome envelope every tool returns, success or failure — never
/// a bare `Result`, so a failed tool invocation can still be logged into
/// `tools_used` without aborting the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    #[must_use]
    pub fn ok(data: Value) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }
}

/// A stateless, concurrently-invocable auxiliary capability.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn parameter_schema(&self) -> Schema;
    async fn execute(&self, params: Value) -> ToolResult;
}

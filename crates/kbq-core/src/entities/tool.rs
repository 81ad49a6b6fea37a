use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Static description of a registered tool — name, human description, and
/// parameter schema. The executable side (`execute`) lives in the `Tool`
/// trait in `kbq-tools`; this struct is the data half used for listing and
/// validation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameter_schema: serde_json::Value,
}

/// Outcome of a single tool invocation, as recorded in
/// `QueryOrchestrator`'s `tools_used`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolInvocation {
    pub tool: String,
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

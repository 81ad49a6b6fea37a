use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::Utc;
use schemars::{schema_for, JsonSchema, Schema};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolResult};

const DEFAULT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

#[derive(Debug, Deserialize, JsonSchema)]
struct DateTimeParams {
    format: Option<String>,
}

fn is_valid_strftime(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Returns the current UTC time, formatted RFC-3339-like by default or by
/// a caller-supplied `strftime` pattern.
pub struct DateTimeTool;

#[async_trait]
impl Tool for DateTimeTool {
    fn name(&self) -> &str {
        "datetime"
    }

    fn parameter_schema(&self) -> Schema {
        schema_for!(DateTimeParams)
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: DateTimeParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(error) => return ToolResult::failure(format!("invalid argument: {error}")),
        };
        let format = params.format.as_deref().unwrap_or(DEFAULT_FORMAT);
        if !is_valid_strftime(format) {
            return ToolResult::failure(format!("invalid format string: {format:?}"));
        }
        let now = Utc::now().format(format).to_string();
        ToolResult::ok(json!({ "now": now }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_format_succeeds() {
        let result = DateTimeTool.execute(json!({})).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn custom_valid_format_succeeds() {
        let result = DateTimeTool.execute(json!({ "format": "%Y" })).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn invalid_format_is_reported_as_failure_not_panic() {
        let result = DateTimeTool.execute(json!({ "format": "%Q" })).await;
        assert!(!result.success);
        assert!(result.error.is_some());
    }
}

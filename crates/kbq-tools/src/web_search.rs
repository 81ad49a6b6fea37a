use async_trait::async_trait;
use schemars::{schema_for, JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tool::{Tool, ToolResult};

const MAX_RESULTS_CAP: u32 = 10;

#[derive(Debug, Deserialize, JsonSchema)]
struct WebSearchParams {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
}

const fn default_max_results() -> u32 {
    MAX_RESULTS_CAP
}

#[derive(Debug, Serialize, Deserialize)]
struct WebSearchHit {
    title: String,
    url: String,
    snippet: String,
}

/// Thin wrapper over an external search API. Network failures are
/// non-fatal tool misses, not handler errors — the orchestrator is
/// expected to proceed without web results.
pub struct WebSearchTool {
    client: reqwest::Client,
    endpoint: String,
}

impl WebSearchTool {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint: endpoint.into() }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn parameter_schema(&self) -> Schema {
        schema_for!(WebSearchParams)
    }

    async fn execute(&self, params: Value) -> ToolResult {
        let params: WebSearchParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(error) => return ToolResult::failure(format!("invalid argument: {error}")),
        };
        let max_results = params.max_results.min(MAX_RESULTS_CAP);

        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("q", params.query.as_str()), ("max_results", &max_results.to_string())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => return ToolResult::failure(format!("network error: {error}")),
        };

        match response.json::<Vec<WebSearchHit>>().await {
            Ok(hits) => ToolResult::ok(json!({ "results": hits })),
            Err(error) => ToolResult::failure(format!("network error: invalid response body: {error}")),
        }
    }
}

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Append-only request trace record. Headers are scrubbed and body content
/// is never stored — only its SHA-256 — before a `Trace` is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Trace {
    pub id: String,
    pub ts: DateTime<Utc>,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub latency_ms: u64,
    pub ip: String,
    pub user_agent: Option<String>,
    pub headers_scrubbed: std::collections::BTreeMap<String, String>,
    pub query_params: std::collections::BTreeMap<String, String>,
    pub body_sha256: String,
    pub session_id: Option<String>,
    pub error: Option<String>,
}

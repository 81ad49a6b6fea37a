use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// `MAX_REQUEST_BYTES` — request bodies larger than this are rejected
    /// with `CoreError::BadRequest` before extraction runs.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: u64,
    /// `ALLOWED_ORIGINS` — CORS allowlist for the HTTP surface; empty means
    /// same-origin only.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// `TRACE_MAX_RECORDS` — capacity of the bounded trace ring.
    #[serde(default = "default_trace_max_records")]
    pub trace_max_records: usize,
    /// `TRACE_MAX_AGE_SECONDS` — traces older than this are evicted even if
    /// the ring has spare capacity.
    #[serde(default = "default_trace_max_age_seconds")]
    pub trace_max_age_seconds: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_bytes: default_max_request_bytes(),
            allowed_origins: Vec::new(),
            trace_max_records: default_trace_max_records(),
            trace_max_age_seconds: default_trace_max_age_seconds(),
        }
    }
}

fn default_max_request_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_trace_max_records() -> usize {
    1000
}

fn default_trace_max_age_seconds() -> u64 {
    24 * 60 * 60
}

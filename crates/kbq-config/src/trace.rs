use serde::{Deserialize, Serialize};

/// Controls what the request trace ring keeps from a raw HTTP request. Sizing
/// the ring itself is `LimitsConfig`'s job (`trace_max_records`,
/// `trace_max_age_seconds`); this is about what gets written into each slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Header names (case-insensitive) replaced with a fixed redaction
    /// marker before a request is written into the ring.
    #[serde(default = "default_redact_headers")]
    pub redact_headers: Vec<String>,
    /// Whether to hash request bodies into `Trace::body_sha256`. Disabling
    /// this leaves the field empty, for deployments that don't want even a
    /// hash of request content retained.
    #[serde(default = "default_true")]
    pub hash_bodies: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            redact_headers: default_redact_headers(),
            hash_bodies: true,
        }
    }
}

fn default_redact_headers() -> Vec<String> {
    vec![
        "authorization".to_string(),
        "x-api-key".to_string(),
        "cookie".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

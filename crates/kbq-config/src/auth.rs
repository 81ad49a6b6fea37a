use serde::{Deserialize, Serialize};

/// Credentials accepted by `kbq-auth`'s dual-mode gate: an HMAC signing key
/// for bearer JWTs, and a static key for the `X-Api-Key` path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// `AUTH_SIGNING_KEY` — HS256 secret used to verify bearer tokens.
    #[serde(default)]
    pub signing_key: String,
    /// `API_KEY` — static key accepted on the `X-Api-Key` header.
    #[serde(default)]
    pub api_key: String,
}

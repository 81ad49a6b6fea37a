use serde::{Deserialize, Serialize};

/// HS256 JWT claims. `jti` is the key back into the `SessionStore` — the
/// token itself carries no scopes; those live on the `Session` record so
/// revocation (disabling or deleting a session) takes effect immediately
/// without waiting for the token to expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

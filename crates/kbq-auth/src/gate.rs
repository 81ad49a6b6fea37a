use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use kbq_core::entities::Session;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::claims::Claims;
use crate::error::AuthError;
use crate::session_store::SessionStore;

/// Scope that satisfies any `require_scope` check — granted to the
/// synthetic session created by a successful API-key match.
pub const FULL_SCOPE: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Bearer,
    ApiKey,
}

/// The authenticated identity and scopes derived from a request's
/// credential, returned by a successful `AuthGate::authenticate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub subject: String,
    pub scopes: BTreeSet<String>,
    pub auth_method: AuthMethod,
}

impl AuthContext {
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope) || self.scopes.contains(FULL_SCOPE)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::InsufficientScope`] if neither `scope` nor
    /// [`FULL_SCOPE`] is present.
    pub fn require_scope(&self, scope: &str) -> Result<(), AuthError> {
        if self.has_scope(scope) {
            Ok(())
        } else {
            Err(AuthError::InsufficientScope(scope.to_string()))
        }
    }
}

/// Credentials extracted from an inbound request, independent of whatever
/// transport parses the headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Credentials<'a> {
    pub bearer: Option<&'a str>,
    pub api_key: Option<&'a str>,
}

/// Validates bearer tokens and API keys, and mints new bearer sessions.
///
/// Bearer path: HS256-signed JWT whose `jti` must resolve to a non-expired,
/// non-disabled `Session`. Api-key path: constant-time comparison against
/// the configured key, granting a synthetic full-scope session.
pub struct AuthGate {
    signing_key: String,
    api_key: String,
    sessions: Arc<dyn SessionStore>,
}

impl AuthGate {
    #[must_use]
    pub fn new(signing_key: String, api_key: String, sessions: Arc<dyn SessionStore>) -> Self {
        Self { signing_key, api_key, sessions }
    }

    /// Mints a new bearer token and registers its backing session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredential`] if the signing key can't
    /// encode a token (e.g. is empty).
    pub async fn issue_token(
        &self,
        subject: &str,
        scopes: BTreeSet<String>,
        ttl: TimeDelta,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let session = Session {
            id: jti.clone(),
            token_jti: jti.clone(),
            scopes,
            issued_at: now,
            expires_at: now + ttl,
            disabled: false,
        };
        self.sessions.put(session).await;

        let claims = Claims {
            sub: subject.to_string(),
            jti,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.signing_key.as_bytes()),
        )
        .map_err(|e| AuthError::InvalidCredential(e.to_string()))
    }

    /// Revokes the session behind a bearer token's `jti`, independent of its
    /// JWT expiry.
    pub async fn revoke(&self, jti: &str) {
        self.sessions.revoke(jti).await;
    }

    /// Authenticates a request. Bearer credential is tried first; if
    /// absent, falls back to the API key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredential`] if neither header is
    /// present, [`AuthError::InvalidCredential`] if a credential is
    /// malformed or doesn't verify, or [`AuthError::Expired`] if a bearer
    /// token's session has expired or been disabled.
    pub async fn authenticate(&self, credentials: Credentials<'_>) -> Result<AuthContext, AuthError> {
        if let Some(token) = credentials.bearer {
            return self.authenticate_bearer(token).await;
        }
        if let Some(candidate) = credentials.api_key {
            return self.authenticate_api_key(candidate);
        }
        Err(AuthError::MissingCredential)
    }

    async fn authenticate_bearer(&self, token: &str) -> Result<AuthContext, AuthError> {
        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.signing_key.as_bytes()),
            &Validation::new(jsonwebtoken::Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidCredential(e.to_string()),
        })?;

        let session = self
            .sessions
            .get(&decoded.claims.jti)
            .await
            .ok_or_else(|| AuthError::InvalidCredential("unknown session".to_string()))?;

        if !session.is_valid_at(Utc::now()) {
            return Err(AuthError::Expired);
        }

        Ok(AuthContext {
            subject: decoded.claims.sub,
            scopes: session.scopes,
            auth_method: AuthMethod::Bearer,
        })
    }

    fn authenticate_api_key(&self, candidate: &str) -> Result<AuthContext, AuthError> {
        if self.api_key.is_empty() || !bool::from(self.api_key.as_bytes().ct_eq(candidate.as_bytes())) {
            return Err(AuthError::InvalidCredential("api key mismatch".to_string()));
        }
        Ok(AuthContext {
            subject: "api_key".to_string(),
            scopes: BTreeSet::from([FULL_SCOPE.to_string()]),
            auth_method: AuthMethod::ApiKey,
        })
    }
}

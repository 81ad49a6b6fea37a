use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A bearer-token session record. Looked up by `jti` during `AuthGate`
/// bearer-token validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    pub id: String,
    pub token_jti: String,
    pub scopes: BTreeSet<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub disabled: bool,
}

impl Session {
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.disabled && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in_secs: i64, disabled: bool) -> Session {
        let now = Utc::now();
        Session {
            id: "ses-1".into(),
            token_jti: "jti-1".into(),
            scopes: BTreeSet::from(["query".to_string()]),
            issued_at: now,
            expires_at: now + chrono::TimeDelta::seconds(expires_in_secs),
            disabled,
        }
    }

    #[test]
    fn expired_by_one_second_is_invalid() {
        let s = session(-1, false);
        assert!(!s.is_valid_at(Utc::now()));
    }

    #[test]
    fn disabled_session_is_invalid_even_if_unexpired() {
        let s = session(3600, true);
        assert!(!s.is_valid_at(Utc::now()));
    }

    #[test]
    fn active_session_is_valid() {
        let s = session(3600, false);
        assert!(s.is_valid_at(Utc::now()));
    }
}

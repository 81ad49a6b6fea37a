use std::collections::HashMap;

use async_trait::async_trait;
use kbq_core::entities::Session;
use tokio::sync::RwLock;

/// Looks sessions up by `jti` during bearer-token validation. Deliberately
/// separate from `kbq-storage::Storage` — sessions are global, not scoped
/// to a project.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, jti: &str) -> Option<Session>;
    async fn put(&self, session: Session);
    /// Marks a session disabled without removing its history. Idempotent.
    async fn revoke(&self, jti: &str);
}

/// Process-local session store. Sessions don't survive a restart — a fresh
/// token exchange is required after one, same as losing an in-memory cache.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, jti: &str) -> Option<Session> {
        self.sessions.read().await.get(jti).cloned()
    }

    async fn put(&self, session: Session) {
        self.sessions.write().await.insert(session.token_jti.clone(), session);
    }

    async fn revoke(&self, jti: &str) {
        if let Some(session) = self.sessions.write().await.get_mut(jti) {
            session.disabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn session(jti: &str) -> Session {
        Session {
            id: "ses-1".into(),
            token_jti: jti.into(),
            scopes: BTreeSet::from(["query".to_string()]),
            issued_at: Utc::now(),
            expires_at: Utc::now() + chrono::TimeDelta::hours(1),
            disabled: false,
        }
    }

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let store = InMemorySessionStore::default();
        store.put(session("jti-1")).await;
        assert_eq!(store.get("jti-1").await.unwrap().token_jti, "jti-1");
    }

    #[tokio::test]
    async fn unknown_jti_is_none() {
        let store = InMemorySessionStore::default();
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn revoke_disables_without_removing() {
        let store = InMemorySessionStore::default();
        store.put(session("jti-1")).await;
        store.revoke("jti-1").await;
        assert!(store.get("jti-1").await.unwrap().disabled);
    }
}

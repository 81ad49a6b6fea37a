use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A tenant namespace owning a set of FAQs, KB records, attachments, and
/// index versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Free-form tag reserved for future multi-org partitioning; unused by
    /// retrieval today.
    #[serde(default)]
    pub org_hint: Option<String>,
}

impl Project {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            created_at: now,
            updated_at: now,
            org_hint: None,
        }
    }

    /// Deactivate the project (soft-delete). Queries treat an inactive
    /// project as `NotFound`.
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.active = false;
        self.updated_at = now;
    }
}

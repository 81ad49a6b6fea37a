use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An immutable, atomically-published bundle of search artifacts for a
/// project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IndexVersion {
    pub project_id: String,
    pub version: u64,
    pub built_at: DateTime<Utc>,
    pub record_fingerprint: String,
    pub dense_artifact: bool,
    pub sparse_artifact: bool,
    /// Always `true` once a version has been published — the basic
    /// substring artifact is never optional.
    pub basic_artifact: bool,
}

impl IndexVersion {
    #[must_use]
    pub fn new(project_id: impl Into<String>, version: u64, record_fingerprint: String) -> Self {
        Self {
            project_id: project_id.into(),
            version,
            built_at: Utc::now(),
            record_fingerprint,
            dense_artifact: false,
            sparse_artifact: false,
            basic_artifact: true,
        }
    }
}

/// Which artifact a `Storage::put_index_artifact` / `get_index_artifact`
/// call is addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Dense,
    Sparse,
    Basic,
    Meta,
}

impl ArtifactKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Sparse => "sparse",
            Self::Basic => "basic",
            Self::Meta => "meta",
        }
    }
}

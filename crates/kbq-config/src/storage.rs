use serde::{Deserialize, Serialize};

/// Which backend a project's records and artifacts live in.
///
/// Mirrors the `STORAGE_TYPE` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    #[default]
    File,
    FileShare,
    Blob,
    DocDb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub storage_type: StorageType,
    /// Root path (file/fileshare) or container/bucket name (blob/doc_db).
    /// Interpretation is left to the `Storage` implementation selected by
    /// `storage_type`.
    #[serde(default = "default_root")]
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::default(),
            root: default_root(),
        }
    }
}

fn default_root() -> String {
    ".kbq/data".to_string()
}

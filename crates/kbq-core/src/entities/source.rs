use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where a FAQ or KB record's content originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Entered directly through `ContentAPI`.
    Manual,
    /// Produced by `Extractor` from an uploaded document.
    Upload,
}

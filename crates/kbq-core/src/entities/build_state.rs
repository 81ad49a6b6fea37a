use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-project build status tracked by `IndexManager`.
///
/// Invariant: `target_version >= current_version`; readers always observe
/// `current_version`'s artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BuildState {
    pub current_version: u64,
    pub target_version: u64,
    pub building: bool,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_error: Option<String>,
    /// Bounded history of the last few build attempts (newest first), so
    /// `build-status` can answer "what happened recently" without a full
    /// trail.
    #[serde(default)]
    pub history: Vec<BuildAttempt>,
}

/// Maximum number of entries retained in `BuildState::history`.
pub const MAX_BUILD_HISTORY: usize = 10;

impl Default for BuildState {
    fn default() -> Self {
        Self {
            current_version: 0,
            target_version: 0,
            building: false,
            started_at: None,
            last_error: None,
            history: Vec::new(),
        }
    }
}

impl BuildState {
    /// Record the outcome of a build attempt, keeping only the most recent
    /// `MAX_BUILD_HISTORY` entries.
    pub fn push_history(&mut self, attempt: BuildAttempt) {
        self.history.insert(0, attempt);
        self.history.truncate(MAX_BUILD_HISTORY);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BuildAttempt {
    pub version: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: BuildOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BuildOutcome {
    Published,
    Skipped,
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_caps_at_max() {
        let mut state = BuildState::default();
        for v in 0..(MAX_BUILD_HISTORY as u64 + 5) {
            state.push_history(BuildAttempt {
                version: v,
                started_at: Utc::now(),
                finished_at: Utc::now(),
                outcome: BuildOutcome::Published,
            });
        }
        assert_eq!(state.history.len(), MAX_BUILD_HISTORY);
        assert_eq!(state.history[0].version, MAX_BUILD_HISTORY as u64 + 4);
    }
}

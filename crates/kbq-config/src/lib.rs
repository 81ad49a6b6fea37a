//! # kbq-config
//!
//! Layered configuration loading for the knowledge-base query service,
//! using `figment`.
//!
//! Configuration sources (in priority order):
//! 1. Environment variables (`KBQ_*`)
//! 2. Project-level `.kbq/config.toml`
//! 3. Built-in defaults
//!
//! Every environment variable named in the service design is a field here:
//! `STORAGE_TYPE`, `AUTH_SIGNING_KEY`, `API_KEY`, `COMPLETER_MODEL`,
//! `EMBEDDER_MODEL`, `MAX_REQUEST_BYTES`, `ALLOWED_ORIGINS`,
//! `TRACE_MAX_RECORDS`, `TRACE_MAX_AGE_SECONDS`.

mod auth;
mod error;
mod limits;
mod storage;
mod trace;

pub use auth::AuthConfig;
pub use error::ConfigError;
pub use limits::LimitsConfig;
pub use storage::{StorageConfig, StorageType};
pub use trace::TraceConfig;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Turns `[("AUTH__SIGNING_KEY", "...")]`-style overrides into a nested JSON
/// object (`{"auth": {"signing_key": "..."}}`), using the same `__` path
/// separator as [`Env::split`] so overrides merge with identical precedence
/// rules to environment variables.
fn nest_overrides(overrides: &[(String, String)]) -> Value {
    let mut root = Map::new();
    for (key, value) in overrides {
        let segments: Vec<&str> = key.split("__").collect();
        insert_nested(&mut root, &segments, value);
    }
    Value::Object(root)
}

fn insert_nested(map: &mut Map<String, Value>, segments: &[&str], value: &str) {
    let key = segments[0].to_ascii_lowercase();
    if segments.len() == 1 {
        map.insert(key, Value::String(value.to_string()));
        return;
    }
    let entry = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(nested) = entry {
        insert_nested(nested, &segments[1..], value);
    }
}

/// Fully resolved configuration for one process.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KbqConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    /// Opaque to this crate — forwarded to whatever `Completer`
    /// implementation is wired in at startup.
    #[serde(default)]
    pub completer_model: String,
    /// Opaque to this crate — forwarded to whatever `Embedder`
    /// implementation is wired in at startup.
    #[serde(default)]
    pub embedder_model: String,
}

impl KbqConfig {
    /// Load configuration from `.kbq/config.toml` (if present) and `KBQ_*`
    /// environment variables, layered over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or merged.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env_overrides(&[])
    }

    /// Same as [`Self::load`], plus additional `(key, value)` overrides
    /// applied with the same precedence as environment variables — used to
    /// splice in values resolved from an external secrets backend
    /// (`kbq-secrets`) without that crate depending on `figment` directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or merged.
    pub fn load_with_env_overrides(overrides: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let project_toml = Path::new(".kbq/config.toml");
        if project_toml.exists() {
            figment = figment.merge(Toml::file(project_toml));
        }

        figment = figment.merge(Env::prefixed("KBQ_").split("__"));

        if !overrides.is_empty() {
            let nested = nest_overrides(overrides);
            figment = figment.merge(Serialized::defaults(nested));
        }

        figment.extract().map_err(ConfigError::from)
    }
}

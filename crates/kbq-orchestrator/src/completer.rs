use std::time::Duration;

use async_trait::async_trait;

use crate::error::CompleterError;
use crate::prompt::{SOURCES_END, SOURCES_START};

/// Pluggable answer generator. A real implementation wraps an LLM API call;
/// [`FallbackCompleter`] ships as the default so the orchestrator always has
/// something to call even with no model configured.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str, deadline: Duration) -> Result<String, CompleterError>;
}

/// Deterministic answer: the acknowledgement sentence plus the excerpts the
/// prompt composer embedded between the `SOURCES_START`/`SOURCES_END`
/// markers, newline-separated. Used whenever no LLM-backed `Completer` is
/// configured, or a configured one fails.
pub struct FallbackCompleter;

#[async_trait]
impl Completer for FallbackCompleter {
    async fn complete(&self, prompt: &str, _deadline: Duration) -> Result<String, CompleterError> {
        let excerpts = extract_source_excerpts(prompt);
        if excerpts.is_empty() {
            return Ok("I couldn't find anything relevant to answer this question.".to_string());
        }
        let ack = format!(
            "Based on {} source{}, here is what I found:",
            excerpts.len(),
            if excerpts.len() == 1 { "" } else { "s" }
        );
        Ok(format!("{ack}\n{}", excerpts.join("\n")))
    }
}

fn extract_source_excerpts(prompt: &str) -> Vec<String> {
    let Some(start) = prompt.find(SOURCES_START) else {
        return Vec::new();
    };
    let body_start = start + SOURCES_START.len();
    let end = prompt[body_start..].find(SOURCES_END).map_or(prompt.len(), |i| body_start + i);
    prompt[body_start..end]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

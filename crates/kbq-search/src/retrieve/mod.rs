//! Hybrid retrieval: runs the dense/sparse/basic providers available for a
//! project, fuses their rankings, and returns a deduplicated, truncated
//! source list.

mod fusion;

pub use fusion::{fuse, Fused, FUSED_SCORE_FLOOR, RRF_K};

use std::collections::HashMap;

use kbq_embeddings::Embedder;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::index::{
    basic_top_n, dense_top_n, sparse_top_n, BasicArtifact, DenseArtifact, IndexableRecord,
    SourceKind, SparseArtifact,
};

/// A single retrieved result, ready for the orchestrator's prompt
/// composition or direct citation in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub kind: SourceKind,
    pub title: String,
    pub excerpt: String,
    /// Best individual provider score, kept for display.
    pub score: f32,
    /// Reciprocal-rank-fused score across every provider that ranked this
    /// source. This, not `score`, is what a "does retrieval have enough"
    /// check (e.g. whether to fall back to a tool) should compare against
    /// [`FUSED_SCORE_FLOOR`]'s sibling thresholds.
    pub fused_score: f64,
    pub attachment_url: Option<String>,
}

/// Everything `retrieve` needs for one query against one project's current
/// snapshot. `records` denormalizes every FAQ/KB record currently indexed,
/// used to resolve ids back to title/excerpt/parent-document information
/// after fusion.
pub struct RetrieveInput<'a> {
    pub query: &'a str,
    pub k: usize,
    pub records: &'a [IndexableRecord],
    pub dense: Option<&'a DenseArtifact>,
    pub sparse: Option<&'a SparseArtifact>,
    pub basic: &'a BasicArtifact,
    pub embedder: Option<&'a dyn Embedder>,
}

const EXCERPT_MAX_CHARS: usize = 280;

fn excerpt(body: &str) -> String {
    if body.chars().count() <= EXCERPT_MAX_CHARS {
        return body.to_string();
    }
    let truncated: String = body.chars().take(EXCERPT_MAX_CHARS).collect();
    format!("{truncated}…")
}

fn attachment_url(record: &IndexableRecord) -> Option<String> {
    record
        .attachment_id
        .as_ref()
        .map(|_| format!("/v1/projects/{}/kb/{}", record.project_id, record.id))
}

/// Runs the available providers, fuses their rankings via reciprocal-rank
/// fusion, collapses chunks that share a `parent_document_id`, and returns
/// at most `input.k` sources above the fused-score floor.
///
/// # Errors
///
/// Returns [`SearchError::Embedding`] if the embedder is configured but
/// fails on the query text. Dense or sparse artifact absence is not an
/// error — retrieval degrades to the remaining providers.
pub async fn retrieve(input: RetrieveInput<'_>) -> Result<Vec<Source>, SearchError> {
    let n = (input.k * 4).max(20);
    let mut lists: Vec<Vec<(String, f32)>> = Vec::with_capacity(3);

    if let (Some(dense), Some(embedder)) = (input.dense, input.embedder) {
        let mut query_vectors = embedder.embed(&[input.query.to_string()]).await?;
        if let Some(query_vector) = query_vectors.pop() {
            lists.push(dense_top_n(dense, &query_vector, n));
        }
    }
    if let Some(sparse) = input.sparse {
        lists.push(sparse_top_n(sparse, input.query, n));
    }
    lists.push(basic_top_n(input.basic, input.query, n));

    let fused = fuse(&lists);

    let by_id: HashMap<&str, &IndexableRecord> =
        input.records.iter().map(|r| (r.id.as_str(), r)).collect();

    fn rank_key(fused: &Fused, record: &IndexableRecord) -> (f64, u32, String) {
        (-fused.fused_score, record.chunk_index, record.id.clone())
    }

    let mut best_per_document: HashMap<String, (Fused, &IndexableRecord)> = HashMap::new();
    for candidate in fused {
        let Some(&record) = by_id.get(candidate.id.as_str()) else {
            continue;
        };
        let key = rank_key(&candidate, record);
        match best_per_document.get(&record.parent_document_id) {
            Some((existing, existing_record)) if rank_key(existing, existing_record) <= key => {}
            _ => {
                best_per_document.insert(record.parent_document_id.clone(), (candidate, record));
            }
        }
    }

    let mut deduped: Vec<(Fused, &IndexableRecord)> = best_per_document.into_values().collect();
    deduped.sort_by(|(a, ar), (b, br)| rank_key(a, ar).partial_cmp(&rank_key(b, br)).unwrap());

    let sources = deduped
        .into_iter()
        .filter(|(fused, _)| fused.fused_score >= FUSED_SCORE_FLOOR)
        .take(input.k)
        .map(|(fused, record)| Source {
            id: record.id.clone(),
            kind: record.kind,
            title: record.title.clone(),
            excerpt: excerpt(&record.body),
            score: fused.best_score,
            fused_score: fused.fused_score,
            attachment_url: attachment_url(record),
        })
        .collect();

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{build_basic, SourceKind};
    use pretty_assertions::assert_eq;

    fn record(id: &str, parent: &str, chunk_index: u32, title: &str, body: &str) -> IndexableRecord {
        IndexableRecord {
            id: id.to_string(),
            project_id: "p1".to_string(),
            kind: SourceKind::Kb,
            title: title.to_string(),
            body: body.to_string(),
            parent_document_id: parent.to_string(),
            chunk_index,
            attachment_id: None,
        }
    }

    #[tokio::test]
    async fn basic_only_retrieval_ranks_by_token_overlap() {
        let records = vec![
            record("a", "a", 0, "Rust basics", "Rust is a systems language"),
            record("b", "b", 0, "Gardening", "Water your plants every morning"),
        ];
        let basic = build_basic(&records);
        let input = RetrieveInput {
            query: "rust systems language",
            k: 5,
            records: &records,
            dense: None,
            sparse: None,
            basic: &basic,
            embedder: None,
        };
        let sources = retrieve(input).await.unwrap();
        assert_eq!(sources[0].id, "a");
    }

    #[tokio::test]
    async fn chunks_sharing_a_parent_document_collapse_to_one_source() {
        let records = vec![
            record("doc-0", "doc", 0, "Manual", "installing the widget requires tools"),
            record("doc-1", "doc", 1, "Manual", "widget installation finishes with a reboot"),
        ];
        let basic = build_basic(&records);
        let input = RetrieveInput {
            query: "widget installation",
            k: 5,
            records: &records,
            dense: None,
            sparse: None,
            basic: &basic,
            embedder: None,
        };
        let sources = retrieve(input).await.unwrap();
        assert_eq!(sources.len(), 1);
    }

    #[tokio::test]
    async fn results_below_the_fused_score_floor_are_dropped() {
        let records = vec![record("a", "a", 0, "Unrelated", "nothing matches here")];
        let basic = build_basic(&records);
        let input = RetrieveInput {
            query: "completely different topic",
            k: 5,
            records: &records,
            dense: None,
            sparse: None,
            basic: &basic,
            embedder: None,
        };
        let sources = retrieve(input).await.unwrap();
        assert!(sources.is_empty());
    }
}

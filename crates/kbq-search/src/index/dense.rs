use kbq_embeddings::Embedder;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::index::record::IndexableRecord;

/// Brute-force cosine-similarity artifact: one embedding vector per record.
///
/// No SQL engine sits behind the abstract `Storage` trait, so the scan is
/// done in-process rather than pushed down to a database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DenseArtifact {
    pub entries: Vec<(String, Vec<f32>)>,
}

/// Embeds every record's indexable text and stores the resulting vectors.
///
/// # Errors
///
/// Returns [`SearchError::Embedding`] if the embedder fails.
pub async fn build_dense(
    records: &[IndexableRecord],
    embedder: &dyn Embedder,
) -> Result<DenseArtifact, SearchError> {
    if records.is_empty() {
        return Ok(DenseArtifact::default());
    }
    let texts: Vec<String> = records.iter().map(IndexableRecord::indexable_text).collect();
    let vectors = embedder.embed(&texts).await?;
    let entries = records
        .iter()
        .zip(vectors)
        .map(|(record, vector)| (record.id.clone(), vector))
        .collect();
    Ok(DenseArtifact { entries })
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Top-`n` ids by cosine similarity to `query_vector`, best first.
#[must_use]
pub fn dense_top_n(artifact: &DenseArtifact, query_vector: &[f32], n: usize) -> Vec<(String, f32)> {
    let mut scored: Vec<(String, f32)> = artifact
        .entries
        .iter()
        .map(|(id, vector)| (id.clone(), cosine_similarity(query_vector, vector)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(n);
    scored
}

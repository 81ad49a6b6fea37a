use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::index::record::IndexableRecord;
use crate::index::tokenize::tokenize;

/// Lowercased `title + "\n" + body` token set, always built regardless of
/// embedder or dense/sparse availability — the floor of the degradation
/// ladder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicArtifact {
    entries: Vec<(String, Vec<String>)>,
}

#[must_use]
pub fn build_basic(records: &[IndexableRecord]) -> BasicArtifact {
    let entries = records
        .iter()
        .map(|record| {
            let mut tokens: Vec<String> = tokenize(&record.indexable_text());
            tokens.sort();
            tokens.dedup();
            (record.id.clone(), tokens)
        })
        .collect();
    BasicArtifact { entries }
}

/// Top-`n` ids by fraction of query tokens present in the record, best
/// first. Score = `|query tokens ∩ record tokens| / |query tokens|`.
#[must_use]
pub fn basic_top_n(artifact: &BasicArtifact, query: &str, n: usize) -> Vec<(String, f32)> {
    let mut query_tokens: Vec<String> = tokenize(query);
    query_tokens.sort();
    query_tokens.dedup();
    if query_tokens.is_empty() {
        return Vec::new();
    }
    let query_len = query_tokens.len() as f32;

    let mut ranked: Vec<(String, f32)> = artifact
        .entries
        .iter()
        .filter_map(|(id, tokens)| {
            let doc_tokens: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            let matches = query_tokens
                .iter()
                .filter(|t| doc_tokens.contains(t.as_str()))
                .count();
            if matches == 0 {
                return None;
            }
            Some((id.clone(), matches as f32 / query_len))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbq_core::entities::RecordSource;
    use kbq_core::entities::{FaqRecord, KbRecord};
    use pretty_assertions::assert_eq;

    fn records() -> Vec<IndexableRecord> {
        let faq = FaqRecord::new("p1", "What is Rust", "Rust is a systems language", RecordSource::Manual);
        let kb = KbRecord::manual("p1", "Gardening tips", "Water your plants every morning");
        vec![IndexableRecord::from(&faq), IndexableRecord::from(&kb)]
    }

    #[test]
    fn scores_by_fraction_of_query_tokens_matched() {
        let artifact = build_basic(&records());
        let ranked = basic_top_n(&artifact, "rust systems", 10);
        assert_eq!(ranked[0].0, records()[0].id);
        assert!((ranked[0].1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn non_matching_record_is_excluded() {
        let artifact = build_basic(&records());
        let ranked = basic_top_n(&artifact, "rust", 10);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn empty_query_yields_no_matches() {
        let artifact = build_basic(&records());
        assert!(basic_top_n(&artifact, "", 10).is_empty());
    }
}

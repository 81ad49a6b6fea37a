use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::index::record::IndexableRecord;
use crate::index::tokenize::tokenize;

const K1: f64 = 1.2;
const B: f64 = 0.75;

/// BM25 postings over the shared whitespace/lower-case/stop-word tokenizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparseArtifact {
    doc_ids: Vec<String>,
    doc_lengths: Vec<u32>,
    avg_doc_len: f64,
    /// term -> (doc index, term frequency in that doc)
    postings: HashMap<String, Vec<(u32, u32)>>,
}

#[must_use]
pub fn build_sparse(records: &[IndexableRecord]) -> SparseArtifact {
    let mut doc_ids = Vec::with_capacity(records.len());
    let mut doc_lengths = Vec::with_capacity(records.len());
    let mut postings: HashMap<String, Vec<(u32, u32)>> = HashMap::new();

    for (idx, record) in records.iter().enumerate() {
        let tokens = tokenize(&record.indexable_text());
        doc_ids.push(record.id.clone());
        doc_lengths.push(u32::try_from(tokens.len()).unwrap_or(u32::MAX));

        let mut term_freq: HashMap<String, u32> = HashMap::new();
        for token in tokens {
            *term_freq.entry(token).or_insert(0) += 1;
        }
        let doc_idx = u32::try_from(idx).unwrap_or(u32::MAX);
        for (term, freq) in term_freq {
            postings.entry(term).or_default().push((doc_idx, freq));
        }
    }

    let avg_doc_len = if doc_lengths.is_empty() {
        0.0
    } else {
        doc_lengths.iter().map(|&l| f64::from(l)).sum::<f64>() / doc_lengths.len() as f64
    };

    SparseArtifact {
        doc_ids,
        doc_lengths,
        avg_doc_len,
        postings,
    }
}

/// Top-`n` ids by BM25 score against `query`, best first.
#[must_use]
pub fn sparse_top_n(artifact: &SparseArtifact, query: &str, n: usize) -> Vec<(String, f32)> {
    if artifact.doc_ids.is_empty() {
        return Vec::new();
    }
    let num_docs = artifact.doc_ids.len() as f64;
    let mut terms = tokenize(query);
    terms.sort();
    terms.dedup();

    let mut scores: HashMap<u32, f64> = HashMap::new();
    for term in terms {
        let Some(docs) = artifact.postings.get(&term) else {
            continue;
        };
        let doc_freq = docs.len() as f64;
        let idf = ((num_docs - doc_freq + 0.5) / (doc_freq + 0.5) + 1.0).ln();
        for &(doc_idx, freq) in docs {
            let doc_len = f64::from(artifact.doc_lengths[doc_idx as usize]);
            let tf = f64::from(freq);
            let denom = tf + K1 * (1.0 - B + B * doc_len / artifact.avg_doc_len.max(1.0));
            let score = idf * (tf * (K1 + 1.0)) / denom;
            *scores.entry(doc_idx).or_insert(0.0) += score;
        }
    }

    let mut ranked: Vec<(String, f32)> = scores
        .into_iter()
        .map(|(idx, score)| (artifact.doc_ids[idx as usize].clone(), score as f32))
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
    fn ranks_matching_document_above_unrelated_one() {
        let artifact = build_sparse(&records());
        let ranked = sparse_top_n(&artifact, "Rust language", 10);
        assert_eq!(ranked[0].0, records()[0].id);
    }

    #[test]
    fn query_with_no_matching_terms_yields_empty() {
        let artifact = build_sparse(&records());
        let ranked = sparse_top_n(&artifact, "xyzzy plugh", 10);
        assert!(ranked.is_empty());
    }

    #[test]
    fn empty_corpus_never_panics() {
        let artifact = build_sparse(&[]);
        assert!(sparse_top_n(&artifact, "anything", 10).is_empty());
    }
}

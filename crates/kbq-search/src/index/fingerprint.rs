use kbq_core::identity::{content_hash, fingerprint};

use crate::index::record::IndexableRecord;

/// `kbq-core::identity::fingerprint` over the ordered `(id, content_hash)`
/// pairs of `records`, in the order given. Callers pass records in a stable
/// order (e.g. as listed by `Storage`) so equal inputs always yield equal
/// fingerprints.
#[must_use]
pub fn record_fingerprint(records: &[IndexableRecord]) -> String {
    let pairs: Vec<(String, String)> = records
        .iter()
        .map(|record| (record.id.clone(), content_hash(&record.indexable_text())))
        .collect();
    fingerprint(&pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbq_core::entities::{FaqRecord, RecordSource};
    use pretty_assertions::assert_eq;

    #[test]
    fn reordering_records_changes_fingerprint() {
        let a = FaqRecord::new("p1", "q1", "a1", RecordSource::Manual);
        let b = FaqRecord::new("p1", "q2", "a2", RecordSource::Manual);
        let forward = vec![IndexableRecord::from(&a), IndexableRecord::from(&b)];
        let backward = vec![IndexableRecord::from(&b), IndexableRecord::from(&a)];
        assert_ne!(record_fingerprint(&forward), record_fingerprint(&backward));
    }

    #[test]
    fn identical_records_yield_identical_fingerprint() {
        let a = FaqRecord::new("p1", "q1", "a1", RecordSource::Manual);
        let records = vec![IndexableRecord::from(&a)];
        assert_eq!(record_fingerprint(&records), record_fingerprint(&records));
    }
}

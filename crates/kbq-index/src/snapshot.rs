use kbq_core::entities::IndexVersion;
use kbq_search::index::{BasicArtifact, DenseArtifact, IndexableRecord, SparseArtifact};

/// An immutable, reference-counted handle to one published index version's
/// artifacts. Holding a clone pins those artifacts against reclamation —
/// dropping the last clone is what makes them eligible for replacement.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub version: IndexVersion,
    pub records: Vec<IndexableRecord>,
    pub dense: Option<DenseArtifact>,
    pub sparse: Option<SparseArtifact>,
    pub basic: BasicArtifact,
}

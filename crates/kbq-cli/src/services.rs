use std::sync::Arc;

use kbq_auth::AuthGate;
use kbq_content::ContentAPI;
use kbq_index::IndexManager;
use kbq_orchestrator::QueryOrchestrator;
use kbq_storage::Storage;
use kbq_trace::TraceRing;

/// Process-wide singletons, constructed once at startup and shut down in
/// reverse order. Request handlers (outside this crate's scope) borrow from
/// this aggregate rather than reaching into ambient globals.
pub struct Services {
    pub storage: Arc<dyn Storage>,
    pub index: IndexManager,
    pub auth: AuthGate,
    pub content: ContentAPI,
    pub orchestrator: QueryOrchestrator,
    pub trace: Arc<TraceRing>,
}

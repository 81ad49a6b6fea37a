mod completer;
mod error;
mod orchestrator;
mod prompt;
mod selection;

pub use completer::{Completer, FallbackCompleter};
pub use error::{CompleterError, OrchestratorError};
pub use orchestrator::{QueryInput, QueryOrchestrator, QueryResponse};

//! Entity structs for all domain objects in the knowledge-base query service.
//!
//! Every struct derives `Serialize`/`Deserialize`/`JsonSchema` so it can be
//! persisted by a `Storage` backend and described to a transport layer
//! without this crate depending on one.

mod attachment;
mod build_state;
mod credential;
mod faq;
mod index_version;
mod kb;
mod project;
mod source;
mod tool;
mod trace;

pub use attachment::Attachment;
pub use build_state::{BuildAttempt, BuildOutcome, BuildState, MAX_BUILD_HISTORY};
pub use credential::Session;
pub use faq::FaqRecord;
pub use index_version::{ArtifactKind, IndexVersion};
pub use kb::KbRecord;
pub use project::Project;
pub use source::RecordSource;
pub use tool::{ToolDescriptor, ToolInvocation};
pub use trace::Trace;

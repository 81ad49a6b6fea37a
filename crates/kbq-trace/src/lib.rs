mod error;
mod ring;
mod scrub;

pub use error::TraceError;
pub use ring::{TraceFilter, TraceRing};
pub use scrub::{hash_body, scrub_headers};

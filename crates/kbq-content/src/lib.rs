mod api;
mod error;

pub use api::{ContentAPI, KbContent, UploadResult};
pub use error::ContentError;

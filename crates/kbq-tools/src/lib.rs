mod datetime;
mod error;
mod registry;
mod tool;
#[cfg(feature = "web-search")]
mod web_search;

pub use datetime::DateTimeTool;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolResult};
#[cfg(feature = "web-search")]
pub use web_search::WebSearchTool;

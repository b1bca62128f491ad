//! Screen preview module
//!
//! Produces the standalone HTML page used to look at a document before
//! exporting it. The body always comes from the sanitizer.

mod document;

pub(crate) use document::html_escape;
pub use document::preview_document;

//! HTML Sanitization Module
//!
//! Restricts rendered HTML to a fixed allow-list of tags and attributes
//! before it is previewed or exported.
//!
//! # Policy
//!
//! - Tags outside [`ALLOWED_TAGS`] are unwrapped (children kept), except the
//!   [`CONTENT_REMOVED_TAGS`] which disappear with their whole subtree
//! - Attributes outside [`ALLOWED_ATTRIBUTES`] are dropped, including every
//!   `on*` event handler
//! - `href` values must use one of [`ALLOWED_URL_SCHEMES`] or be relative
//! - Anchors always carry `target="_blank" rel="noopener noreferrer"`
//!
//! # Architecture
//!
//! - `policy.rs` - ammonia-based sanitizer and the [`SanitizedHtml`] type
//! - `inspect.rs` - independent DOM walk that re-checks sanitized output

mod inspect;
mod policy;

pub use inspect::{find_violation, Violation};
pub use policy::{
    sanitize, HtmlSanitizer, SanitizedHtml, ALLOWED_ATTRIBUTES, ALLOWED_TAGS,
    ALLOWED_URL_SCHEMES, CONTENT_REMOVED_TAGS,
};

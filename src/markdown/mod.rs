//! Markdown rendering module
//!
//! This module turns author markup into an HTML fragment using the comrak
//! library, a CommonMark + GFM compatible parser.
//!
//! # Features
//! - GitHub Flavored Markdown tables and strikethrough
//! - Autolinking of bare URLs and email addresses
//! - Typographic substitutions (smart quotes, dashes)
//! - Hardened hyperlinks (`target="_blank" rel="noopener noreferrer"`)
//!
//! The output is *not* safe to display on its own; it always goes through
//! [`crate::sanitize`] before preview or export.
//!
//! # Example
//! ```
//! use mdconvert::markdown::render;
//!
//! let html = render("# Hello\n\nSee https://example.com");
//! assert!(html.contains("noopener noreferrer"));
//! ```

mod renderer;
mod sample;

pub use renderer::{
    harden_links, render, MarkdownRenderer, RawHtmlMode, RenderOptions, HARDENED_LINK_ATTRS,
};
pub use sample::{PREVIEW_PLACEHOLDER, SAMPLE_MARKDOWN};

//! mdconvert - Markdown conversion and export
//!
//! Markdown is rendered to HTML with comrak, passed through an allow-list
//! sanitizer, and then shown as a preview or exported as a PDF document, a
//! Word-compatible document, or HTML on the clipboard.

pub mod config;
pub mod error;
pub mod export;
pub mod markdown;
pub mod notifications;
pub mod pipeline;
pub mod preview;
pub mod sanitize;

pub use error::{Error, Result};
pub use pipeline::Pipeline;

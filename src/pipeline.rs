//! Render → sanitize composition
//!
//! The renderer and the sanitizer stay two independent pure functions; this
//! module only wires them together for the two consumers: the screen preview
//! and the export operations.

use crate::markdown::{MarkdownRenderer, RawHtmlMode, PREVIEW_PLACEHOLDER};
use crate::sanitize::{HtmlSanitizer, SanitizedHtml};
use log::debug;

/// Markdown → sanitized HTML pipeline.
#[derive(Debug, Default)]
pub struct Pipeline {
    renderer: MarkdownRenderer,
    sanitizer: HtmlSanitizer,
}

impl Pipeline {
    pub fn new(raw_html: RawHtmlMode) -> Self {
        Self {
            renderer: MarkdownRenderer::new(raw_html),
            sanitizer: HtmlSanitizer::new(),
        }
    }

    /// Produce the snapshot handed to export operations.
    ///
    /// Blank markup yields an empty snapshot, which every export rejects.
    pub fn prepare_export(&self, markdown: &str) -> SanitizedHtml {
        if markdown.trim().is_empty() {
            return SanitizedHtml::empty();
        }
        let html = self.renderer.render(markdown);
        let snapshot = self.sanitizer.sanitize(&html);
        debug!(
            "Prepared export snapshot: {} bytes markdown -> {} bytes HTML",
            markdown.len(),
            snapshot.as_str().len()
        );
        snapshot
    }

    /// Produce the HTML shown in the live preview.
    ///
    /// Blank markup yields the placeholder markup.
    pub fn render_preview(&self, markdown: &str) -> SanitizedHtml {
        if markdown.trim().is_empty() {
            return self.sanitizer.sanitize(PREVIEW_PLACEHOLDER);
        }
        self.sanitizer.sanitize(&self.renderer.render(markdown))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

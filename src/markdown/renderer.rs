//! Markdown to HTML rendering using comrak
//!
//! The renderer configuration is fixed apart from how raw HTML embedded in
//! the markdown is treated. Every hyperlink in the output is hardened to open
//! in a new browsing context without access to its opener.

use crate::sanitize::CONTENT_REMOVED_TAGS;
use comrak::nodes::NodeValue;
use comrak::{format_html, markdown_to_html, parse_document, Arena, Options};
use log::warn;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Attributes appended to every anchor produced by the renderer.
pub const HARDENED_LINK_ATTRS: &str = r#"target="_blank" rel="noopener noreferrer""#;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// How raw HTML embedded in the markdown source is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RawHtmlMode {
    /// Render raw HTML as literal, escaped text
    #[default]
    Escape,
    /// Drop raw HTML tags but keep their text content
    Omit,
    /// Emit raw HTML verbatim (the sanitizer still runs afterwards)
    PassThrough,
}

/// Renderer configuration.
///
/// Autolinking and typographic substitutions are always enabled; only the
/// raw HTML policy can vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub raw_html: RawHtmlMode,
}

impl RenderOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;

        // Smart quotes and dashes
        options.parse.smart = true;

        match self.raw_html {
            RawHtmlMode::Escape => options.render.escape = true,
            // Omit rewrites raw HTML nodes to plain text before rendering.
            RawHtmlMode::Omit | RawHtmlMode::PassThrough => options.render.unsafe_ = true,
        }

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Deterministic markdown renderer.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a renderer with the given raw HTML policy.
    pub fn new(raw_html: RawHtmlMode) -> Self {
        Self {
            options: RenderOptions { raw_html },
        }
    }

    /// Render markdown into an HTML fragment with hardened links.
    ///
    /// Never fails: malformed markdown degrades to literal text.
    pub fn render(&self, markdown: &str) -> String {
        let options = self.options.to_comrak_options();
        let html = match self.options.raw_html {
            RawHtmlMode::Omit => render_without_tags(markdown, &options),
            _ => markdown_to_html(markdown, &options),
        };
        harden_links(&html)
    }
}

/// Render with every raw HTML node reduced to its text content.
///
/// Elements whose content is never shown (scripts, styles) lose their text
/// as well.
fn render_without_tags(markdown: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, options);

    let mut stripper = ammonia::Builder::empty();
    stripper.clean_content_tags(CONTENT_REMOVED_TAGS.iter().copied().collect());

    for node in root.descendants() {
        let mut ast = node.data.borrow_mut();
        match &mut ast.value {
            NodeValue::HtmlBlock(block) => {
                block.literal = stripper.clean(&block.literal).to_string();
            }
            NodeValue::HtmlInline(html) => {
                *html = stripper.clean(html).to_string();
            }
            _ => {}
        }
    }

    let mut output = Vec::new();
    if let Err(e) = format_html(root, options, &mut output) {
        warn!("Failed to format markdown, escaping raw HTML instead: {}", e);
        return markdown_to_html(markdown, &RenderOptions::default().to_comrak_options());
    }
    String::from_utf8_lossy(&output).into_owned()
}

/// Render markdown with the default (escaping) configuration.
pub fn render(markdown: &str) -> String {
    MarkdownRenderer::default().render(markdown)
}

// ─────────────────────────────────────────────────────────────────────────────
// Link Hardening
// ─────────────────────────────────────────────────────────────────────────────

fn anchor_open_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<a(\s[^>]*?)?\s*(/?)>").expect("anchor pattern is valid")
    })
}

fn target_rel_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\s(?:target|rel)\b(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?"#)
            .expect("attribute pattern is valid")
    })
}

/// Rewrite every anchor opening tag so it carries
/// `target="_blank" rel="noopener noreferrer"`, replacing author values.
pub fn harden_links(html: &str) -> String {
    anchor_open_tag()
        .replace_all(html, |caps: &Captures<'_>| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let attrs = target_rel_attr().replace_all(attrs, "");
            format!("<a{} {}{}>", attrs, HARDENED_LINK_ATTRS, &caps[2])
        })
        .into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

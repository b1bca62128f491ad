//! Allow-list sanitization policy built on ammonia.

use super::inspect::{find_violation, Violation};
use crate::markdown::PREVIEW_PLACEHOLDER;
use ammonia::{Builder, UrlRelative};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Policy Tables
// ─────────────────────────────────────────────────────────────────────────────

/// Elements that survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "strong", "em", "u", "s", "del", "a", "ul",
    "ol", "li", "blockquote", "code", "pre", "table", "thead", "tbody", "tr", "th", "td", "hr",
    "img", "div", "span",
];

/// Attributes that survive sanitization.
///
/// `target` and `rel` are only ever present on anchors, where their values
/// are forced rather than copied from the input.
pub const ALLOWED_ATTRIBUTES: &[&str] = &["href", "target", "rel", "alt", "title", "class"];

/// Elements removed together with their entire subtree.
///
/// Every other element outside [`ALLOWED_TAGS`] is unwrapped: the element
/// goes, its children stay.
pub const CONTENT_REMOVED_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template",
];

/// URL schemes accepted on `href`. Relative URLs are passed through.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

const GENERIC_ATTRIBUTES: &[&str] = &["alt", "title", "class"];
const LINK_TARGET: &str = "_blank";
const LINK_REL: &str = "noopener noreferrer";
/// Upper bound on re-cleaning passes while waiting for stable output.
const MAX_CLEAN_PASSES: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Sanitized HTML
// ─────────────────────────────────────────────────────────────────────────────

/// HTML that has passed through the sanitizer.
///
/// Only the sanitizer can build a non-empty value, so export operations that
/// take a `&SanitizedHtml` cannot be handed untrusted markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedHtml(String);

impl SanitizedHtml {
    /// The empty document.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Whether the snapshot has real content to export.
    ///
    /// Blank output and output equal to the preview placeholder are both
    /// rejected. Documents that merely mention the placeholder text pass.
    pub fn is_exportable(&self) -> bool {
        !self.is_empty() && self.0.trim() != sanitized_placeholder().trim()
    }

    /// Re-check that no executable content is present.
    pub fn verify(&self) -> Result<(), Violation> {
        match find_violation(&self.0) {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}

impl fmt::Display for SanitizedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sanitizer
// ─────────────────────────────────────────────────────────────────────────────

/// Allow-list HTML sanitizer.
pub struct HtmlSanitizer {
    builder: Builder<'static>,
}

impl HtmlSanitizer {
    /// Create a sanitizer with the fixed allow-list policy.
    pub fn new() -> Self {
        let mut tag_attributes = HashMap::new();
        tag_attributes.insert("a", HashSet::from(["href"]));

        let mut builder = Builder::default();
        builder
            .tags(ALLOWED_TAGS.iter().copied().collect())
            .clean_content_tags(CONTENT_REMOVED_TAGS.iter().copied().collect())
            .generic_attributes(GENERIC_ATTRIBUTES.iter().copied().collect())
            .tag_attributes(tag_attributes)
            .set_tag_attribute_value("a", "target", LINK_TARGET)
            .link_rel(Some(LINK_REL))
            .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
            .url_relative(UrlRelative::PassThrough)
            .strip_comments(true);

        Self { builder }
    }

    /// Sanitize an HTML fragment.
    ///
    /// Total and idempotent: parse problems degrade to best-effort output.
    ///
    /// A single ammonia pass can emit markup that re-parses into a different
    /// tree (nested anchors, misplaced table content), so the output is
    /// cleaned again until it no longer changes.
    pub fn sanitize(&self, html: &str) -> SanitizedHtml {
        SanitizedHtml(self.clean_to_fixpoint(html))
    }

    fn clean_to_fixpoint(&self, html: &str) -> String {
        let mut current = self.clean_once(html);
        for _ in 1..MAX_CLEAN_PASSES {
            let next = self.clean_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn clean_once(&self, html: &str) -> String {
        keep_pre_leading_newline(&self.builder.clean(html).to_string())
    }
}

/// The parser drops one newline directly after `<pre>`, but the serializer
/// does not write it back. Doubling it keeps a leading newline in the
/// content stable across re-parsing.
fn keep_pre_leading_newline(html: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(<pre(?:\s+[a-z]+="[^"]*")*\s*>)\n"#).expect("pre pattern is valid")
    });
    re.replace_all(html, "$1\n\n").into_owned()
}

/// The placeholder markup as the sanitizer emits it.
fn sanitized_placeholder() -> &'static str {
    static PLACEHOLDER: OnceLock<String> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| HtmlSanitizer::new().clean_to_fixpoint(PREVIEW_PLACEHOLDER))
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HtmlSanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlSanitizer").finish_non_exhaustive()
    }
}

/// Sanitize an HTML fragment with the fixed policy.
pub fn sanitize(html: &str) -> SanitizedHtml {
    HtmlSanitizer::new().sanitize(html)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

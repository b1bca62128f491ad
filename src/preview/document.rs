//! Standalone preview page
//!
//! The preview uses the same stylesheet as the PDF export, so what is seen
//! on screen matches what gets printed. A few screen-only rules are added on
//! top.

use crate::export::pdf::PrintStyle;
use crate::sanitize::SanitizedHtml;

const DEFAULT_TITLE: &str = "Markdown Preview";

/// Generate a complete HTML preview page from a sanitized fragment.
///
/// `body` is expected to come from
/// [`Pipeline::render_preview`](crate::pipeline::Pipeline::render_preview).
pub fn preview_document(body: &SanitizedHtml, title: Option<&str>, style: &PrintStyle) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{print_css}{screen_css}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title.unwrap_or(DEFAULT_TITLE)),
        print_css = style.css(),
        screen_css = screen_css(style),
        body = body.as_str(),
    )
}

fn screen_css(style: &PrintStyle) -> String {
    format!(
        r#"
@media screen {{
    body {{ padding: 2rem 1.5rem; }}
    img {{ max-width: 100%; }}
    table {{ border-collapse: collapse; }}
}}
.text-muted-foreground {{ color: {muted}; font-style: italic; }}
"#,
        muted = style.quote_text.to_css(),
    )
}

/// HTML-escape a string.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

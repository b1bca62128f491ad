//! Print stylesheet for the PDF export
//!
//! [`PrintStyle`] is the single source of the print look: it generates the
//! CSS of the wrapped print document and drives the PDF layout.

use crate::preview::html_escape;
use crate::sanitize::SanitizedHtml;

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// A4 portrait in points.
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    pub const WHITE: Rgb = Rgb::hex(0xffffff);

    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Components in the 0..=1 range used by PDF color operators.
    pub fn to_pdf(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// Heading sizes relative to the body size, h1 through h6.
const HEADING_SCALE: [f32; 6] = [2.0, 1.6, 1.3, 1.15, 1.0, 0.9];

// ─────────────────────────────────────────────────────────────────────────────
// Print Style
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed print look: serif body, A4 portrait, half-inch margins.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStyle {
    pub page_width: f32,
    pub page_height: f32,
    /// Margin on every side, in points
    pub margin: f32,
    /// Body font size in points
    pub body_size: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
    pub text: Rgb,
    pub heading: Rgb,
    pub link: Rgb,
    pub code_background: Rgb,
    pub quote_border: Rgb,
    pub quote_text: Rgb,
    pub rule: Rgb,
    pub table_border: Rgb,
}

impl Default for PrintStyle {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: 0.5 * POINTS_PER_INCH,
            body_size: 11.0,
            line_height: 1.6,
            text: Rgb::hex(0x333333),
            heading: Rgb::hex(0x2c3e50),
            link: Rgb::hex(0x3498db),
            code_background: Rgb::hex(0xf4f4f4),
            quote_border: Rgb::hex(0xffd24a),
            quote_text: Rgb::hex(0x666666),
            rule: Rgb::hex(0xcccccc),
            table_border: Rgb::hex(0xdddddd),
        }
    }
}

impl PrintStyle {
    /// Set the body font size; headings and code scale with it.
    pub fn with_body_size(mut self, size: f32) -> Self {
        self.body_size = size;
        self
    }

    /// Font size of a heading level (1-6, clamped).
    pub fn heading_size(&self, level: u8) -> f32 {
        let index = usize::from(level.clamp(1, 6)) - 1;
        self.body_size * HEADING_SCALE[index]
    }

    pub fn code_size(&self) -> f32 {
        self.body_size * 0.86
    }

    /// Width available to content between the margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Generate the CSS of the print document.
    pub fn css(&self) -> String {
        format!(
            r#"
@page {{
    size: A4 portrait;
    margin: 0.5in;
}}

body {{
    font-family: Georgia, serif;
    font-size: {body}pt;
    line-height: {line_height};
    color: {text};
    max-width: 800px;
    margin: 0 auto;
    background: {background};
}}

h1, h2, h3, h4, h5, h6 {{ color: {heading}; margin-top: 1.5em; }}
h1 {{ font-size: {h1}pt; }}
h2 {{ font-size: {h2}pt; }}
h3 {{ font-size: {h3}pt; }}
pre {{ background: {code_bg}; padding: 1em; border-radius: 4px; }}
code {{ background: {code_bg}; padding: 0.2em 0.4em; border-radius: 3px; font-size: {code}pt; }}
blockquote {{
    border-left: 4px solid {quote_border};
    margin: 1em 0;
    padding-left: 1em;
    color: {quote_text};
}}
a {{ color: {link}; text-decoration: none; }}
hr {{ border: none; border-top: 1px solid {rule}; }}
th, td {{ border: 1px solid {table_border}; padding: 4px 8px; }}
"#,
            body = self.body_size,
            line_height = self.line_height,
            text = self.text.to_css(),
            background = Rgb::WHITE.to_css(),
            heading = self.heading.to_css(),
            h1 = self.heading_size(1),
            h2 = self.heading_size(2),
            h3 = self.heading_size(3),
            code_bg = self.code_background.to_css(),
            code = self.code_size(),
            quote_border = self.quote_border.to_css(),
            quote_text = self.quote_text.to_css(),
            link = self.link.to_css(),
            rule = self.rule.to_css(),
            table_border = self.table_border.to_css(),
        )
    }
}

/// Wrap sanitized HTML into the standalone print document.
pub fn print_document(body: &SanitizedHtml, style: &PrintStyle, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>{css}</style>
</head>
<body>{body}</body>
</html>"#,
        title = html_escape(title),
        css = style.css(),
        body = body.as_str(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! PDF generation
//!
//! Sanitized HTML is wrapped in the print document ([`print_document`]),
//! laid out onto A4 pages ([`layout_document`]) and encoded with lopdf
//! ([`encode_pdf`]). Text stays selectable: pages carry real text runs in
//! the standard Times and Courier faces, not images.

mod fonts;
mod layout;
mod stylesheet;
mod writer;

pub use fonts::{text_width, to_win_ansi, FontFace};
pub use layout::{layout_document, DrawOp, Page};
pub use stylesheet::{print_document, PrintStyle, Rgb, A4_HEIGHT, A4_WIDTH, POINTS_PER_INCH};
pub use writer::encode_pdf;

use crate::sanitize::SanitizedHtml;
use std::fmt;

/// Title stored in the PDF document information.
pub const DOCUMENT_TITLE: &str = "Markdown Document";

/// Errors that can occur while producing a PDF.
#[derive(Debug)]
pub enum PdfError {
    /// The object graph could not be serialized
    Encoding(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::Encoding(msg) => write!(f, "PDF encoding error: {}", msg),
        }
    }
}

impl std::error::Error for PdfError {}

/// Render sanitized HTML into PDF bytes in one step.
pub fn render_pdf(body: &SanitizedHtml, style: &PrintStyle) -> Result<Vec<u8>, PdfError> {
    let document = print_document(body, style, DOCUMENT_TITLE);
    let pages = layout_document(&document, style);
    encode_pdf(&pages, style, DOCUMENT_TITLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;

    #[test]
    fn test_render_pdf_hello() {
        let body = Pipeline::default().prepare_export("# Hello");
        let bytes = render_pdf(&body, &PrintStyle::default()).unwrap();
        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 1);
        assert!(bytes.windows(7).any(|w| w == b"(Hello)"));
    }

    #[test]
    fn test_render_pdf_sample_document() {
        let body = Pipeline::default().prepare_export(crate::markdown::SAMPLE_MARKDOWN);
        let bytes = render_pdf(&body, &PrintStyle::default()).unwrap();
        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(!document.get_pages().is_empty());
    }

    #[test]
    fn test_pdf_error_display() {
        let err = PdfError::Encoding("bad xref".to_string());
        assert!(err.to_string().contains("bad xref"));
    }
}

//! Export kinds and options
//!
//! This module defines the three export operations, their fixed artifact
//! names and user-facing messages, and the options shared by the engine.

use super::pdf::PrintStyle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shown when an export is triggered without any content.
pub const EMPTY_CONTENT_MESSAGE: &str = "Please add some markdown content first!";

/// How long a settled task keeps reporting its outcome.
pub const DEFAULT_SUCCESS_WINDOW: Duration = Duration::from_millis(2000);

// ─────────────────────────────────────────────────────────────────────────────
// Export Kind
// ─────────────────────────────────────────────────────────────────────────────

/// The independent export operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Paginated A4 PDF document
    Pdf,
    /// Word-compatible HTML document
    Word,
    /// Sanitized HTML on the system clipboard
    Copy,
}

impl ExportKind {
    /// Number of export kinds.
    pub const COUNT: usize = 3;

    /// Get the display label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "PDF",
            ExportKind::Word => "Word",
            ExportKind::Copy => "Copy HTML",
        }
    }

    /// Fixed file name of the artifact (clipboard exports have none).
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            ExportKind::Pdf => Some("markdown-document.pdf"),
            ExportKind::Word => Some("markdown-document.doc"),
            ExportKind::Copy => None,
        }
    }

    /// MIME type of the artifact.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            ExportKind::Pdf => Some("application/pdf"),
            ExportKind::Word => Some(super::word::CONTENT_TYPE),
            ExportKind::Copy => None,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "PDF generated successfully!",
            ExportKind::Word => "Word document generated successfully!",
            ExportKind::Copy => "HTML copied to clipboard!",
        }
    }

    /// Generic message shown when the operation fails. Causes are only logged.
    pub fn failure_message(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "Failed to generate PDF. Please try again.",
            ExportKind::Word => "Failed to generate Word document. Please try again.",
            ExportKind::Copy => "Failed to copy HTML. Please try again.",
        }
    }

    /// Slot index of this kind in per-kind tables.
    pub fn index(&self) -> usize {
        match self {
            ExportKind::Pdf => 0,
            ExportKind::Word => 1,
            ExportKind::Copy => 2,
        }
    }

    /// Get all export kinds.
    pub fn all() -> &'static [ExportKind] {
        &[ExportKind::Pdf, ExportKind::Word, ExportKind::Copy]
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for the export engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// How long Succeeded/Failed stays visible before a task reads as Idle
    pub success_window: Duration,

    /// Whether to open saved files with the system handler
    pub open_after_export: bool,

    /// Print stylesheet used by the PDF export
    pub print_style: PrintStyle,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            success_window: DEFAULT_SUCCESS_WINDOW,
            open_after_export: false,
            print_style: PrintStyle::default(),
        }
    }
}

impl ExportOptions {
    /// Set the outcome display window.
    pub fn with_success_window(mut self, window: Duration) -> Self {
        self.success_window = window;
        self
    }

    /// Open exported files after saving.
    pub fn with_open_after_export(mut self, open: bool) -> Self {
        self.open_after_export = open;
        self
    }

    /// Set the PDF body font size in points.
    pub fn with_pdf_font_size(mut self, size: f32) -> Self {
        self.print_style = self.print_style.with_body_size(size);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_kind_file_names() {
        assert_eq!(ExportKind::Pdf.file_name(), Some("markdown-document.pdf"));
        assert_eq!(ExportKind::Word.file_name(), Some("markdown-document.doc"));
        assert_eq!(ExportKind::Copy.file_name(), None);
    }

    #[test]
    fn test_export_kind_mime_types() {
        assert_eq!(ExportKind::Pdf.mime_type(), Some("application/pdf"));
        assert_eq!(
            ExportKind::Word.mime_type(),
            Some("application/msword;charset=utf-8")
        );
        assert_eq!(ExportKind::Copy.mime_type(), None);
    }

    #[test]
    fn test_export_kind_indices_are_dense() {
        let mut seen = [false; ExportKind::COUNT];
        for kind in ExportKind::all() {
            assert!(!seen[kind.index()]);
            seen[kind.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_failure_messages_are_generic() {
        for kind in ExportKind::all() {
            assert!(kind.failure_message().ends_with("Please try again."));
        }
    }

    #[test]
    fn test_export_kind_serialization() {
        assert_eq!(serde_json::to_string(&ExportKind::Word).unwrap(), "\"word\"");
    }

    #[test]
    fn test_export_options_default() {
        let options = ExportOptions::default();
        assert_eq!(options.success_window, Duration::from_millis(2000));
        assert!(!options.open_after_export);
    }

    #[test]
    fn test_export_options_builders() {
        let options = ExportOptions::default()
            .with_success_window(Duration::ZERO)
            .with_open_after_export(true)
            .with_pdf_font_size(14.0);
        assert_eq!(options.success_window, Duration::ZERO);
        assert!(options.open_after_export);
        assert_eq!(options.print_style.body_size, 14.0);
    }
}

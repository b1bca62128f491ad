//! Export error type
//!
//! Every failure of an export operation is caught at the operation boundary
//! and turned into exactly one notification. The variant decides the
//! severity; the underlying cause is kept for logging only.

use super::options::{ExportKind, EMPTY_CONTENT_MESSAGE};
use crate::notifications::Severity;
use crate::sanitize::Violation;
use std::fmt;

/// Boxed underlying cause of a failed export.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can settle an export operation.
#[derive(Debug)]
pub enum ExportError {
    /// Nothing to export (blank input or the preview placeholder)
    EmptyContent,

    /// Rendering, serialization, file or clipboard failure
    ExportFailed { kind: ExportKind, source: BoxError },

    /// Sanitized HTML still carried executable content
    SanitizationViolation(Violation),
}

impl ExportError {
    /// Wrap an underlying cause for the given export kind.
    pub fn failed(kind: ExportKind, source: impl Into<BoxError>) -> Self {
        ExportError::ExportFailed {
            kind,
            source: source.into(),
        }
    }

    /// Notification severity used to report this error.
    pub fn severity(&self) -> Severity {
        match self {
            ExportError::EmptyContent => Severity::Info,
            ExportError::ExportFailed { .. } | ExportError::SanitizationViolation(_) => {
                Severity::Error
            }
        }
    }

    /// Message shown to the user. Never includes the underlying cause.
    pub fn user_message(&self, kind: ExportKind) -> &'static str {
        match self {
            ExportError::EmptyContent => EMPTY_CONTENT_MESSAGE,
            ExportError::ExportFailed { .. } | ExportError::SanitizationViolation(_) => {
                kind.failure_message()
            }
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EmptyContent => write!(f, "No content to export"),
            ExportError::ExportFailed { kind, source } => {
                write!(f, "{} export failed: {}", kind.label(), source)
            }
            ExportError::SanitizationViolation(violation) => {
                write!(f, "Sanitized HTML contains {}", violation)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::ExportFailed { source, .. } => Some(source.as_ref()),
            ExportError::EmptyContent | ExportError::SanitizationViolation(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn test_empty_content_is_informational() {
        let err = ExportError::EmptyContent;
        assert_eq!(err.severity(), Severity::Info);
        assert_eq!(
            err.user_message(ExportKind::Pdf),
            "Please add some markdown content first!"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_export_failed_hides_cause_from_user() {
        let err = ExportError::failed(
            ExportKind::Pdf,
            io::Error::new(io::ErrorKind::Other, "font table corrupt"),
        );
        assert_eq!(err.severity(), Severity::Error);
        assert!(!err.user_message(ExportKind::Pdf).contains("font table"));
        assert!(err.to_string().contains("font table corrupt"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_failed_accepts_string_causes() {
        let err = ExportError::failed(ExportKind::Copy, "no clipboard");
        assert!(err.to_string().starts_with("Copy HTML export failed"));
    }

    #[test]
    fn test_violation_display() {
        let err = ExportError::SanitizationViolation(Violation::Element("script".into()));
        assert_eq!(err.severity(), Severity::Error);
        assert!(err.to_string().contains("<script>"));
    }
}

//! Settings for mdconvert
//!
//! This module defines the user-adjustable settings with serde
//! serialization support for JSON configuration files.

use crate::export::ExportOptions;
use crate::markdown::RawHtmlMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings, read from `config.json`.
///
/// Every field has a default so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory for exported files (`None` = current directory)
    pub output_dir: Option<PathBuf>,

    /// Display window of auto-dismissing notifications, in milliseconds
    pub notification_duration_ms: u64,

    /// How long a finished export keeps showing its outcome, in milliseconds
    pub success_window_ms: u64,

    /// Treatment of raw HTML embedded in the markdown
    pub raw_html: RawHtmlMode,

    /// Open exported files with the system handler
    pub open_after_export: bool,

    /// PDF body font size in points
    pub pdf_font_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: None,
            notification_duration_ms: 3000,
            success_window_ms: 2000,
            raw_html: RawHtmlMode::default(),
            open_after_export: false,
            pdf_font_size: 11.0,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum notification display window.
    pub const MIN_NOTIFICATION_MS: u64 = 500;
    /// Maximum notification display window.
    pub const MAX_NOTIFICATION_MS: u64 = 60_000;
    /// Maximum success display window.
    pub const MAX_SUCCESS_WINDOW_MS: u64 = 10_000;
    /// Minimum PDF body font size.
    pub const MIN_PDF_FONT_SIZE: f32 = 8.0;
    /// Maximum PDF body font size.
    pub const MAX_PDF_FONT_SIZE: f32 = 18.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// Config files are edited by hand, so out-of-range values are expected.
    pub fn sanitize(&mut self) {
        self.notification_duration_ms = self
            .notification_duration_ms
            .clamp(Self::MIN_NOTIFICATION_MS, Self::MAX_NOTIFICATION_MS);

        self.success_window_ms = self.success_window_ms.min(Self::MAX_SUCCESS_WINDOW_MS);

        if !self.pdf_font_size.is_finite() {
            self.pdf_font_size = Self::default().pdf_font_size;
        }
        self.pdf_font_size = self
            .pdf_font_size
            .clamp(Self::MIN_PDF_FONT_SIZE, Self::MAX_PDF_FONT_SIZE);

        if self
            .output_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.output_dir = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived values
    // ─────────────────────────────────────────────────────────────────────────

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }

    pub fn success_window(&self) -> Duration {
        Duration::from_millis(self.success_window_ms)
    }

    /// Directory exports are written to.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Export engine options derived from these settings.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::default()
            .with_success_window(self.success_window())
            .with_open_after_export(self.open_after_export)
            .with_pdf_font_size(self.pdf_font_size)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.output_dir, None);
        assert_eq!(settings.notification_duration(), Duration::from_millis(3000));
        assert_eq!(settings.success_window(), Duration::from_millis(2000));
        assert_eq!(settings.raw_html, RawHtmlMode::Escape);
        assert!(!settings.open_after_export);
        assert_eq!(settings.pdf_font_size, 11.0);
    }

    #[test]
    fn test_sanitize_clamps_ranges() {
        let mut settings = Settings {
            notification_duration_ms: 10,
            success_window_ms: 1_000_000,
            pdf_font_size: 99.0,
            ..Settings::default()
        };
        settings.sanitize();

        assert_eq!(settings.notification_duration_ms, Settings::MIN_NOTIFICATION_MS);
        assert_eq!(settings.success_window_ms, Settings::MAX_SUCCESS_WINDOW_MS);
        assert_eq!(settings.pdf_font_size, Settings::MAX_PDF_FONT_SIZE);
    }

    #[test]
    fn test_sanitize_non_finite_font_size() {
        let mut settings = Settings {
            pdf_font_size: f32::NAN,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.pdf_font_size, 11.0);
    }

    #[test]
    fn test_empty_output_dir_means_current_directory() {
        let settings = Settings::from_json_sanitized(r#"{"output_dir": ""}"#).unwrap();
        assert_eq!(settings.output_dir, None);
        assert_eq!(settings.resolved_output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_raw_html_deserialization() {
        let settings = Settings::from_json_sanitized(r#"{"raw_html": "passthrough"}"#).unwrap();
        assert_eq!(settings.raw_html, RawHtmlMode::PassThrough);
    }

    #[test]
    fn test_export_options_follow_settings() {
        let settings = Settings {
            success_window_ms: 500,
            open_after_export: true,
            pdf_font_size: 12.0,
            ..Settings::default()
        };
        let options = settings.export_options();
        assert_eq!(options.success_window, Duration::from_millis(500));
        assert!(options.open_after_export);
        assert_eq!(options.print_style.body_size, 12.0);
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let original = Settings::default();
        let json = serde_json::to_string_pretty(&original).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }
}

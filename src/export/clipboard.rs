//! Clipboard backends for the copy export
//!
//! The primary backend uses the arboard crate. When the process has no
//! clipboard access (headless sessions, sandboxed terminals) the fallback
//! pipes the text into the platform's copy command instead.

// Error variants mirror the operation that failed.
#![allow(clippy::enum_variant_names)]

use arboard::Clipboard;
use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug)]
pub enum ClipboardError {
    /// Failed to access clipboard
    AccessError(String),
    /// Failed to set clipboard content
    WriteError(String),
    /// No mechanism is available on this system
    Unavailable(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::AccessError(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::WriteError(msg) => write!(f, "Clipboard write error: {}", msg),
            ClipboardError::Unavailable(msg) => write!(f, "Clipboard unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        ClipboardError::WriteError(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backends
// ─────────────────────────────────────────────────────────────────────────────

/// A mechanism that can place text on the clipboard.
pub trait ClipboardBackend {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard through arboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &str {
        "system"
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;

        clipboard.set_text(text)?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
const PLATFORM_COMMANDS: &[&[&str]] = &[&["pbcopy"]];

#[cfg(windows)]
const PLATFORM_COMMANDS: &[&[&str]] = &[&["clip"]];

#[cfg(not(any(target_os = "macos", windows)))]
const PLATFORM_COMMANDS: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

/// Copy by piping text into an external program.
///
/// Candidates are tried in order; the first one that starts and exits
/// successfully wins.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    candidates: Vec<Vec<String>>,
}

impl CommandClipboard {
    /// Copy commands for the current platform.
    pub fn platform() -> Self {
        Self::with_candidates(PLATFORM_COMMANDS)
    }

    /// Use an explicit list of commands (program followed by arguments).
    pub fn with_candidates(candidates: &[&[&str]]) -> Self {
        Self {
            candidates: candidates
                .iter()
                .filter(|c| !c.is_empty())
                .map(|c| c.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn run(command: &[String], text: &str) -> Result<(), ClipboardError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| ClipboardError::Unavailable("empty command".to_string()))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::Unavailable(format!("{}: {}", program, e)))?;

        // Dropping stdin closes the pipe so the program sees end of input.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        if let Err(e) = written {
            // Reap the child before reporting.
            if let Err(kill) = child.kill() {
                debug!("{} already exited: {}", program, kill);
            }
            if let Err(wait) = child.wait() {
                debug!("Failed to reap {}: {}", program, wait);
            }
            return Err(ClipboardError::WriteError(format!("{}: {}", program, e)));
        }

        let status = child
            .wait()
            .map_err(|e| ClipboardError::WriteError(format!("{}: {}", program, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::WriteError(format!(
                "{} exited with {}",
                program, status
            )))
        }
    }
}

impl ClipboardBackend for CommandClipboard {
    fn name(&self) -> &str {
        "command"
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut last_error = None;
        for command in &self.candidates {
            match Self::run(command, text) {
                Ok(()) => {
                    debug!("Copied {} bytes with {}", text.len(), command.join(" "));
                    return Ok(());
                }
                Err(err) => {
                    debug!("Copy command failed: {}", err);
                    last_error = Some(err);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| ClipboardError::Unavailable("no copy command configured".to_string())))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError::AccessError("test".to_string());
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn test_clipboard_error_write() {
        let err = ClipboardError::WriteError("write failed".to_string());
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let backend = CommandClipboard::with_candidates(&[&["mdconvert-no-such-copy-tool"]]);
        let err = backend.write_text("x").unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable(_)));
    }

    #[test]
    fn test_no_candidates_is_unavailable() {
        let backend = CommandClipboard::with_candidates(&[]);
        assert!(matches!(
            backend.write_text("x"),
            Err(ClipboardError::Unavailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_falls_through_to_working_command() {
        let backend =
            CommandClipboard::with_candidates(&[&["mdconvert-no-such-copy-tool"], &["cat"]]);
        assert!(backend.write_text("<p>Hello</p>").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_write_error() {
        let backend = CommandClipboard::with_candidates(&[&["false"]]);
        assert!(matches!(
            backend.write_text("x"),
            Err(ClipboardError::WriteError(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_program_that_stops_reading_is_write_error() {
        // `true` exits without reading, so a large write hits a closed pipe.
        let backend = CommandClipboard::with_candidates(&[&["true"]]);
        let text = "x".repeat(4 * 1024 * 1024);
        assert!(matches!(
            backend.write_text(&text),
            Err(ClipboardError::WriteError(_))
        ));
    }

    #[test]
    fn test_arboard_error_converts_to_write_error() {
        let err = ClipboardError::from(arboard::Error::ContentNotAvailable);
        assert!(matches!(err, ClipboardError::WriteError(_)));
    }

    // Note: SystemClipboard tests require a display/clipboard context
    // which isn't typically available in CI environments.
}

//! Document Export Module
//!
//! Turns a sanitized HTML snapshot into one of three artifacts and reports
//! the outcome through the notification manager.
//!
//! # Export Kinds
//!
//! - **PDF**: A4 portrait document, half-inch margins, serif body text
//! - **Word**: HTML envelope with Office directives, served as `application/msword`
//! - **Copy**: The sanitized HTML placed verbatim on the system clipboard
//!
//! # Architecture
//!
//! - `options.rs` - Export kinds, fixed file names and messages, engine options
//! - `task.rs` - Per-kind task state machine held in an arena
//! - `engine.rs` - Trigger handling, precondition checks, notifications
//! - `pdf/` - Print stylesheet, layout and lopdf encoding
//! - `word.rs` - Word-compatible envelope
//! - `clipboard.rs` - Primary and fallback clipboard mechanisms
//! - `sink.rs` - Where file artifacts are written
//! - `error.rs` - Export error type

mod clipboard;
mod engine;
mod error;
mod options;
pub mod pdf;
mod sink;
mod task;
mod word;

pub use clipboard::{ClipboardBackend, ClipboardError, CommandClipboard, SystemClipboard};
pub use engine::{ExportArtifact, ExportEngine, TriggerOutcome};
pub use error::{BoxError, ExportError};
pub use options::{ExportKind, ExportOptions, DEFAULT_SUCCESS_WINDOW, EMPTY_CONTENT_MESSAGE};
pub use sink::{ArtifactSink, FileArtifact, FileSink, MemorySink};
pub use task::{TaskArena, TaskState};
pub use word::{word_document, CONTENT_TYPE as WORD_CONTENT_TYPE};

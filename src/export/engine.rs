//! Export engine
//!
//! Runs the three export operations against a sanitized snapshot. Each kind
//! has its own task slot: a trigger while the same kind is running is
//! ignored, different kinds may run concurrently on the same event loop.
//! Every settled trigger reports exactly one notification.

use super::clipboard::{ClipboardBackend, CommandClipboard, SystemClipboard};
use super::error::ExportError;
use super::options::{ExportKind, ExportOptions};
use super::pdf;
use super::sink::{ArtifactSink, FileArtifact};
use super::task::{TaskArena, TaskState};
use super::word;
use crate::notifications::{NotificationManager, Severity};
use crate::sanitize::SanitizedHtml;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// What a successful export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportArtifact {
    /// A file handed to the artifact sink
    File {
        file_name: String,
        location: PathBuf,
        size: usize,
    },
    /// Text placed on the clipboard
    Clipboard { backend: String, size: usize },
}

impl fmt::Display for ExportArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportArtifact::File { location, size, .. } => {
                write!(f, "{} ({} bytes)", location.display(), size)
            }
            ExportArtifact::Clipboard { backend, size } => {
                write!(f, "{} bytes on the {} clipboard", size, backend)
            }
        }
    }
}

/// Result of one trigger.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// The same kind was already running; nothing happened
    Ignored,
    /// The operation ran to completion
    Settled(Result<ExportArtifact, ExportError>),
}

impl TriggerOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, TriggerOutcome::Ignored)
    }

    /// Whether the operation settled with an export failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TriggerOutcome::Settled(Err(
                ExportError::ExportFailed { .. } | ExportError::SanitizationViolation(_)
            ))
        )
    }
}

/// Coordinates export operations, their task state and their notifications.
pub struct ExportEngine {
    tasks: RefCell<TaskArena>,
    notifications: Rc<NotificationManager>,
    sink: Box<dyn ArtifactSink>,
    clipboard: Box<dyn ClipboardBackend>,
    fallback: Box<dyn ClipboardBackend>,
    options: ExportOptions,
}

impl ExportEngine {
    /// Create an engine with the system clipboard and the platform copy
    /// command as fallback.
    pub fn new(notifications: Rc<NotificationManager>, sink: impl ArtifactSink + 'static) -> Self {
        let options = ExportOptions::default();
        Self {
            tasks: RefCell::new(TaskArena::new(options.success_window)),
            notifications,
            sink: Box::new(sink),
            clipboard: Box::new(SystemClipboard),
            fallback: Box::new(CommandClipboard::platform()),
            options,
        }
    }

    /// Replace the primary and fallback clipboard mechanisms.
    pub fn with_clipboards(
        mut self,
        primary: impl ClipboardBackend + 'static,
        fallback: impl ClipboardBackend + 'static,
    ) -> Self {
        self.clipboard = Box::new(primary);
        self.fallback = Box::new(fallback);
        self
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.tasks = RefCell::new(TaskArena::new(options.success_window));
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn notifications(&self) -> &Rc<NotificationManager> {
        &self.notifications
    }

    /// Current task state of `kind`.
    pub fn state(&self, kind: ExportKind) -> TaskState {
        self.tasks.borrow().state(kind)
    }

    /// Number of accepted triggers of `kind`.
    pub fn attempts(&self, kind: ExportKind) -> u32 {
        self.tasks.borrow().attempts(kind)
    }

    /// Run `kind` against `html` unless that kind is already running.
    ///
    /// The snapshot is only read. All failures settle the task and are
    /// reported as a notification; none escape as a panic or a hard error.
    pub async fn trigger(&self, kind: ExportKind, html: &SanitizedHtml) -> TriggerOutcome {
        if !self.tasks.borrow_mut().begin(kind) {
            return TriggerOutcome::Ignored;
        }

        let result = self.run(kind, html).await;
        self.tasks.borrow_mut().settle(kind, result.is_ok());
        self.report(kind, &result);

        if let Ok(ExportArtifact::File { location, .. }) = &result {
            if self.options.open_after_export {
                if let Err(e) = open::that(location) {
                    warn!("Failed to open {}: {}", location.display(), e);
                }
            }
        }

        TriggerOutcome::Settled(result)
    }

    async fn run(&self, kind: ExportKind, html: &SanitizedHtml) -> Result<ExportArtifact, ExportError> {
        // Fail fast before any rendering work.
        if !html.is_exportable() {
            return Err(ExportError::EmptyContent);
        }
        html.verify().map_err(ExportError::SanitizationViolation)?;

        match kind {
            ExportKind::Pdf => self.export_pdf(html).await,
            ExportKind::Word => self.export_word(html).await,
            ExportKind::Copy => self.copy_html(html).await,
        }
    }

    async fn export_pdf(&self, html: &SanitizedHtml) -> Result<ExportArtifact, ExportError> {
        let style = &self.options.print_style;
        let document = pdf::print_document(html, style, pdf::DOCUMENT_TITLE);
        let pages = pdf::layout_document(&document, style);
        debug!("PDF layout produced {} page(s)", pages.len());
        tokio::task::yield_now().await;

        let bytes = pdf::encode_pdf(&pages, style, pdf::DOCUMENT_TITLE)
            .map_err(|e| ExportError::failed(ExportKind::Pdf, e))?;
        tokio::task::yield_now().await;

        self.save(ExportKind::Pdf, bytes)
    }

    async fn export_word(&self, html: &SanitizedHtml) -> Result<ExportArtifact, ExportError> {
        let document = word::word_document(html);
        tokio::task::yield_now().await;
        self.save(ExportKind::Word, document.into_bytes())
    }

    async fn copy_html(&self, html: &SanitizedHtml) -> Result<ExportArtifact, ExportError> {
        let text = html.as_str();
        tokio::task::yield_now().await;

        let backend = match self.clipboard.write_text(text) {
            Ok(()) => self.clipboard.name(),
            Err(primary) => {
                warn!(
                    "{} clipboard failed ({}), trying {} fallback",
                    self.clipboard.name(),
                    primary,
                    self.fallback.name()
                );
                self.fallback.write_text(text).map_err(|fallback| {
                    ExportError::failed(
                        ExportKind::Copy,
                        format!("{}; fallback: {}", primary, fallback),
                    )
                })?;
                self.fallback.name()
            }
        };

        Ok(ExportArtifact::Clipboard {
            backend: backend.to_string(),
            size: text.len(),
        })
    }

    fn save(&self, kind: ExportKind, bytes: Vec<u8>) -> Result<ExportArtifact, ExportError> {
        let (file_name, mime_type) = kind
            .file_name()
            .zip(kind.mime_type())
            .ok_or_else(|| ExportError::failed(kind, "export kind has no file artifact"))?;
        let size = bytes.len();
        let artifact = FileArtifact::new(file_name, mime_type, bytes);
        let location = self
            .sink
            .save(&artifact)
            .map_err(|e| ExportError::failed(kind, e))?;

        Ok(ExportArtifact::File {
            file_name: file_name.to_string(),
            location,
            size,
        })
    }

    fn report(&self, kind: ExportKind, result: &Result<ExportArtifact, ExportError>) {
        match result {
            Ok(artifact) => {
                info!("{} export succeeded: {}", kind.label(), artifact);
                self.notifications
                    .push(kind.success_message(), Severity::Success);
            }
            Err(ExportError::EmptyContent) => {
                debug!("{} export skipped: no content", kind.label());
                self.notifications
                    .push(ExportError::EmptyContent.user_message(kind), Severity::Info);
            }
            Err(err) => {
                warn!("{}", err);
                self.notifications.push(err.user_message(kind), err.severity());
            }
        }
    }
}

impl fmt::Debug for ExportEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportEngine")
            .field("tasks", &self.tasks.borrow())
            .field("clipboard", &self.clipboard.name())
            .field("fallback", &self.fallback.name())
            .field("options", &self.options)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::clipboard::ClipboardError;
    use crate::export::sink::MemorySink;
    use crate::export::EMPTY_CONTENT_MESSAGE;
    use crate::pipeline::Pipeline;
    use std::io;
    use std::time::Duration;

    /// Clipboard double that records writes and can be told to fail.
    struct ScriptedClipboard {
        name: &'static str,
        fail: bool,
        writes: Rc<RefCell<Vec<String>>>,
    }

    impl ScriptedClipboard {
        fn new(name: &'static str, fail: bool) -> (Self, Rc<RefCell<Vec<String>>>) {
            let writes = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    name,
                    fail,
                    writes: Rc::clone(&writes),
                },
                writes,
            )
        }
    }

    impl ClipboardBackend for ScriptedClipboard {
        fn name(&self) -> &str {
            self.name
        }

        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::AccessError("no display".to_string()));
            }
            self.writes.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    struct FailingSink;

    impl ArtifactSink for FailingSink {
        fn save(&self, _artifact: &FileArtifact) -> io::Result<PathBuf> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    fn engine() -> (ExportEngine, Rc<MemorySink>) {
        let sink = Rc::new(MemorySink::new());
        let (primary, _) = ScriptedClipboard::new("primary", false);
        let (fallback, _) = ScriptedClipboard::new("fallback", false);
        let engine = ExportEngine::new(Rc::new(NotificationManager::new()), Rc::clone(&sink))
            .with_clipboards(primary, fallback);
        (engine, sink)
    }

    fn snapshot(markdown: &str) -> SanitizedHtml {
        Pipeline::default().prepare_export(markdown)
    }

    fn messages(engine: &ExportEngine) -> Vec<(String, Severity)> {
        engine
            .notifications()
            .snapshot()
            .into_iter()
            .map(|n| (n.message, n.severity))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_content_reports_info_and_no_artifact() {
        for markdown in ["", "   \n\t  "] {
            let (engine, sink) = engine();
            let outcome = engine.trigger(ExportKind::Pdf, &snapshot(markdown)).await;

            assert!(matches!(
                outcome,
                TriggerOutcome::Settled(Err(ExportError::EmptyContent))
            ));
            assert!(!outcome.is_failure());
            assert!(sink.is_empty());
            assert_eq!(
                messages(&engine),
                vec![(EMPTY_CONTENT_MESSAGE.to_string(), Severity::Info)]
            );
        }
    }

    #[tokio::test]
    async fn test_placeholder_is_not_exportable() {
        let (engine, sink) = engine();
        let placeholder = Pipeline::default().render_preview("");
        let outcome = engine.trigger(ExportKind::Word, &placeholder).await;
        assert!(matches!(
            outcome,
            TriggerOutcome::Settled(Err(ExportError::EmptyContent))
        ));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_document_mentioning_placeholder_text_is_exported() {
        let (engine, sink) = engine();
        let html = snapshot("# Status\n\nThe Preview will appear here soon.");
        let outcome = engine.trigger(ExportKind::Pdf, &html).await;

        assert!(matches!(outcome, TriggerOutcome::Settled(Ok(_))));
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_pdf_export_hello() {
        let (engine, sink) = engine();
        let outcome = engine.trigger(ExportKind::Pdf, &snapshot("# Hello")).await;

        match outcome {
            TriggerOutcome::Settled(Ok(ExportArtifact::File { file_name, .. })) => {
                assert_eq!(file_name, "markdown-document.pdf");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        let artifacts = sink.artifacts();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].file_name, "markdown-document.pdf");
        assert_eq!(artifacts[0].mime_type, "application/pdf");
        assert!(lopdf::Document::load_mem(&artifacts[0].bytes).is_ok());

        let notes = messages(&engine);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].1, Severity::Success);
        assert_eq!(engine.state(ExportKind::Pdf), TaskState::Succeeded);
    }

    #[tokio::test]
    async fn test_word_export_artifact() {
        let (engine, sink) = engine();
        engine.trigger(ExportKind::Word, &snapshot("Some *text*")).await;

        let artifacts = sink.artifacts();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].file_name, "markdown-document.doc");
        assert_eq!(Some(artifacts[0].mime_type.as_str()), ExportKind::Word.mime_type());
        let body = String::from_utf8(artifacts[0].bytes.clone()).unwrap();
        assert!(body.contains("<em>text</em>"));
        assert!(body.contains("<w:WordDocument>"));
    }

    #[tokio::test]
    async fn test_second_trigger_while_running_is_ignored() {
        let (engine, sink) = engine();
        let html = snapshot("# Hello");

        let (first, second) = tokio::join!(
            engine.trigger(ExportKind::Pdf, &html),
            engine.trigger(ExportKind::Pdf, &html)
        );

        assert!(matches!(first, TriggerOutcome::Settled(Ok(_))));
        assert!(second.is_ignored());
        assert_eq!(sink.len(), 1);
        assert_eq!(engine.attempts(ExportKind::Pdf), 1);
        assert_eq!(engine.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_different_kinds_run_concurrently() {
        let (engine, sink) = engine();
        let html = snapshot("# Report\n\nBody");

        let (pdf, word, copy) = tokio::join!(
            engine.trigger(ExportKind::Pdf, &html),
            engine.trigger(ExportKind::Word, &html),
            engine.trigger(ExportKind::Copy, &html)
        );

        for outcome in [&pdf, &word, &copy] {
            assert!(matches!(outcome, TriggerOutcome::Settled(Ok(_))));
        }
        assert_eq!(sink.len(), 2);
        let notes = messages(&engine);
        assert_eq!(notes.len(), 3);
        assert!(notes.iter().all(|(_, severity)| *severity == Severity::Success));
    }

    #[tokio::test]
    async fn test_copy_writes_sanitized_html_verbatim() {
        let (primary, writes) = ScriptedClipboard::new("primary", false);
        let (fallback, fallback_writes) = ScriptedClipboard::new("fallback", false);
        let engine = ExportEngine::new(Rc::new(NotificationManager::new()), MemorySink::new())
            .with_clipboards(primary, fallback);
        let html = snapshot("<script>alert(1)</script>Hello");

        let outcome = engine.trigger(ExportKind::Copy, &html).await;
        assert!(matches!(
            outcome,
            TriggerOutcome::Settled(Ok(ExportArtifact::Clipboard { ref backend, .. })) if backend == "primary"
        ));
        assert_eq!(*writes.borrow(), vec![html.as_str().to_string()]);
        assert!(fallback_writes.borrow().is_empty());
        assert_eq!(
            messages(&engine),
            vec![("HTML copied to clipboard!".to_string(), Severity::Success)]
        );
    }

    #[tokio::test]
    async fn test_copy_falls_back_when_primary_fails() {
        let (primary, _) = ScriptedClipboard::new("primary", true);
        let (fallback, fallback_writes) = ScriptedClipboard::new("fallback", false);
        let engine = ExportEngine::new(Rc::new(NotificationManager::new()), MemorySink::new())
            .with_clipboards(primary, fallback);

        let outcome = engine.trigger(ExportKind::Copy, &snapshot("copy me")).await;
        assert!(matches!(
            outcome,
            TriggerOutcome::Settled(Ok(ExportArtifact::Clipboard { ref backend, .. })) if backend == "fallback"
        ));
        assert_eq!(fallback_writes.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_copy_fails_only_when_both_mechanisms_fail() {
        let (primary, _) = ScriptedClipboard::new("primary", true);
        let (fallback, _) = ScriptedClipboard::new("fallback", true);
        let engine = ExportEngine::new(Rc::new(NotificationManager::new()), MemorySink::new())
            .with_clipboards(primary, fallback);

        let outcome = engine.trigger(ExportKind::Copy, &snapshot("copy me")).await;
        assert!(outcome.is_failure());
        assert_eq!(
            messages(&engine),
            vec![(
                "Failed to copy HTML. Please try again.".to_string(),
                Severity::Error
            )]
        );
        assert_eq!(engine.state(ExportKind::Copy), TaskState::Failed);
    }

    #[tokio::test]
    async fn test_sink_failure_is_reported_and_task_recovers() {
        let engine = ExportEngine::new(Rc::new(NotificationManager::new()), FailingSink);
        let html = snapshot("# Title");

        let outcome = engine.trigger(ExportKind::Word, &html).await;
        match outcome {
            TriggerOutcome::Settled(Err(ExportError::ExportFailed { kind, source })) => {
                assert_eq!(kind, ExportKind::Word);
                assert!(source.to_string().contains("read-only"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        let notes = messages(&engine);
        assert_eq!(
            notes,
            vec![(
                "Failed to generate Word document. Please try again.".to_string(),
                Severity::Error
            )]
        );

        // No error is fatal: the next trigger is accepted.
        assert!(!engine.trigger(ExportKind::Word, &html).await.is_ignored());
        assert_eq!(engine.attempts(ExportKind::Word), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_state_returns_to_idle_after_window() {
        let (engine, _) = engine();
        let engine = engine.with_options(
            ExportOptions::default().with_success_window(Duration::from_millis(2000)),
        );
        engine.trigger(ExportKind::Copy, &snapshot("x")).await;
        assert_eq!(engine.state(ExportKind::Copy), TaskState::Succeeded);

        tokio::time::advance(Duration::from_millis(2000)).await;
        assert_eq!(engine.state(ExportKind::Copy), TaskState::Idle);
    }
}

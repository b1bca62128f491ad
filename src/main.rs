//! mdconvert - Main Entry Point
//!
//! Converts a markdown file (or stdin) into a sanitized preview page, a PDF
//! document, a Word-compatible document, or HTML on the clipboard.

use clap::Parser;
use log::{debug, info, warn};
use mdconvert::config::{load_config, load_config_from, Settings};
use mdconvert::export::{ExportEngine, ExportKind, FileSink, TriggerOutcome};
use mdconvert::markdown::SAMPLE_MARKDOWN;
use mdconvert::notifications::{NotificationEvent, NotificationManager};
use mdconvert::preview::preview_document;
use mdconvert::{Error, Pipeline, Result};
use std::cell::RefCell;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use tokio::sync::broadcast;

/// Application name constant.
const APP_NAME: &str = "mdconvert";

#[derive(Debug, Parser)]
#[command(name = "mdconvert", version, about = "Convert Markdown to PDF, Word or clipboard HTML")]
struct Cli {
    /// Markdown file to convert ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Write markdown-document.pdf
    #[arg(long)]
    pdf: bool,

    /// Write markdown-document.doc
    #[arg(long)]
    word: bool,

    /// Copy the sanitized HTML to the clipboard
    #[arg(long)]
    copy: bool,

    /// Run every export
    #[arg(long, conflicts_with_all = ["pdf", "word", "copy"])]
    all: bool,

    /// Print a standalone HTML preview page to stdout
    #[arg(long)]
    preview: bool,

    /// Use the built-in sample document as input
    #[arg(long, conflicts_with = "input")]
    sample: bool,

    /// Directory for exported files (overrides the config file)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Read settings from this file instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Open exported files with the system handler
    #[arg(long)]
    open: bool,
}

impl Cli {
    /// Export kinds selected on the command line, in display order.
    fn selected_kinds(&self) -> Vec<ExportKind> {
        if self.all {
            return ExportKind::all().to_vec();
        }
        ExportKind::all()
            .iter()
            .copied()
            .filter(|kind| match kind {
                ExportKind::Pdf => self.pdf,
                ExportKind::Word => self.word,
                ExportKind::Copy => self.copy,
            })
            .collect()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("Command line: {:?}", cli);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}: {}", APP_NAME, err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut settings = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    apply_overrides(&mut settings, &cli);

    let markdown = read_input(&cli)?;
    let pipeline = Pipeline::new(settings.raw_html);

    if cli.preview {
        let style = settings.export_options().print_style;
        let page = preview_document(&pipeline.render_preview(&markdown), None, &style);
        println!("{}", page);
    }

    let kinds = cli.selected_kinds();
    if kinds.is_empty() {
        if !cli.preview {
            info!("No export selected; use --pdf, --word, --copy, --all or --preview");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let notifications = Rc::new(NotificationManager::with_default_duration(
        settings.notification_duration(),
    ));
    let engine = ExportEngine::new(
        Rc::clone(&notifications),
        FileSink::new(settings.resolved_output_dir()),
    )
    .with_options(settings.export_options());

    let snapshot = pipeline.prepare_export(&markdown);
    let events = RefCell::new(notifications.subscribe());
    let (engine, snapshot, kinds, events) = (&engine, &snapshot, &kinds, &events);
    let trigger = |kind: ExportKind| async move {
        if !kinds.contains(&kind) {
            return None;
        }
        let outcome = engine.trigger(kind, snapshot).await;
        print_notifications(&mut events.borrow_mut());
        if let TriggerOutcome::Settled(Ok(artifact)) = &outcome {
            info!("Exported {}", artifact);
        }
        Some(outcome)
    };
    let (pdf, word, copy) = tokio::join!(
        trigger(ExportKind::Pdf),
        trigger(ExportKind::Word),
        trigger(ExportKind::Copy)
    );
    let outcomes: Vec<TriggerOutcome> = [pdf, word, copy].into_iter().flatten().collect();

    // Empty input settles with an Info notice but still fails the run.
    let failed = outcomes
        .iter()
        .any(|outcome| matches!(outcome, TriggerOutcome::Settled(Err(_))));
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(dir) = &cli.out_dir {
        settings.output_dir = Some(dir.clone());
    }
    if cli.open {
        settings.open_after_export = true;
    }
}

/// Print notifications pushed since the last call.
fn print_notifications(events: &mut broadcast::Receiver<NotificationEvent>) {
    loop {
        match events.try_recv() {
            Ok(NotificationEvent::Pushed(notification)) => eprintln!("{}", notification),
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                warn!("Missed {} notification(s)", missed);
            }
            Err(_) => break,
        }
    }
}

fn read_input(cli: &Cli) -> Result<String> {
    if cli.sample {
        return Ok(SAMPLE_MARKDOWN.to_string());
    }

    match cli.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| Error::InputRead {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| Error::InputRead {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(buffer)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mdconvert").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_selected_kinds_follow_flags() {
        assert!(parse(&[]).selected_kinds().is_empty());
        assert_eq!(
            parse(&["--copy", "--pdf"]).selected_kinds(),
            vec![ExportKind::Pdf, ExportKind::Copy]
        );
        assert_eq!(parse(&["--all"]).selected_kinds(), ExportKind::all().to_vec());
    }

    #[test]
    fn test_help_names_the_written_files() {
        use clap::CommandFactory;
        let help = Cli::command().render_long_help().to_string();
        for kind in ExportKind::all() {
            if let Some(file_name) = kind.file_name() {
                assert!(help.contains(file_name), "{file_name} missing from help");
            }
        }
    }

    #[test]
    fn test_all_conflicts_with_single_kinds() {
        let result = Cli::try_parse_from(["mdconvert", "--all", "--word"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sample_conflicts_with_input() {
        let result = Cli::try_parse_from(["mdconvert", "--sample", "notes.md"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_input_from_file_and_sample() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Notes").unwrap();

        let cli = parse(&[path.to_str().unwrap()]);
        assert_eq!(read_input(&cli).unwrap(), "# Notes");

        let cli = parse(&["--sample"]);
        assert_eq!(read_input(&cli).unwrap(), SAMPLE_MARKDOWN);
    }

    #[test]
    fn test_read_missing_input_is_input_error() {
        let cli = parse(&["/nonexistent/notes.md"]);
        assert!(matches!(read_input(&cli), Err(Error::InputRead { .. })));
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = parse(&["--out-dir", "out", "--open"]);
        let mut settings = Settings::default();
        apply_overrides(&mut settings, &cli);
        assert_eq!(settings.output_dir, Some(PathBuf::from("out")));
        assert!(settings.open_after_export);
    }
}

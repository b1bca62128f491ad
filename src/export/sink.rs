//! Artifact sinks
//!
//! Where finished file artifacts go. [`FileSink`] writes into a directory
//! atomically; [`MemorySink`] keeps artifacts in memory.

use log::info;
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A finished file artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileArtifact {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Destination for file artifacts.
pub trait ArtifactSink {
    /// Store the artifact, returning where it was placed.
    ///
    /// On error nothing may be left behind under the artifact's name.
    fn save(&self, artifact: &FileArtifact) -> io::Result<PathBuf>;
}

// ─────────────────────────────────────────────────────────────────────────────
// File Sink
// ─────────────────────────────────────────────────────────────────────────────

/// Writes artifacts into a directory, replacing existing files.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for FileSink {
    fn save(&self, artifact: &FileArtifact) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(&artifact.file_name);

        // The temp file lives in the target directory so persist is a rename.
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(&artifact.bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| e.error)?;

        info!(
            "Saved {} ({} bytes) to {}",
            artifact.mime_type,
            artifact.bytes.len(),
            target.display()
        );
        Ok(target)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Sink
// ─────────────────────────────────────────────────────────────────────────────

/// Collects artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: RefCell<Vec<FileArtifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts saved so far, in order.
    pub fn artifacts(&self) -> Vec<FileArtifact> {
        self.saved.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.saved.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.borrow().is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn save(&self, artifact: &FileArtifact) -> io::Result<PathBuf> {
        self.saved.borrow_mut().push(artifact.clone());
        Ok(PathBuf::from(&artifact.file_name))
    }
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for std::rc::Rc<S> {
    fn save(&self, artifact: &FileArtifact) -> io::Result<PathBuf> {
        (**self).save(artifact)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

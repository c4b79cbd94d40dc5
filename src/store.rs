//! Persistence and checkpointing
//!
//! The driver only sees these traits; the binary wires in the file on
//! disk and git, tests wire in `memory`.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Where the document text lives between steps
pub trait DocumentStore {
    fn load(&mut self) -> Result<String>;
    fn store(&mut self, text: &str) -> Result<()>;
}

/// Records one revertible snapshot per consolidated operation
pub trait Checkpoint {
    fn record(&mut self, operation: &str) -> Result<()>;
}

/// A document file, rewritten in place
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

impl DocumentStore for FileStore {
    fn load(&mut self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))
    }

    fn store(&mut self, text: &str) -> Result<()> {
        std::fs::write(&self.path, text).map_err(|e| Error::io(&self.path, e))
    }
}

/// Commits all tracked changes with `git commit -am`
#[derive(Debug, Clone)]
pub struct GitCheckpoint {
    dir: PathBuf,
}

impl GitCheckpoint {
    /// Commit in the directory containing `document`
    pub fn for_document(document: &Path) -> Self {
        let dir = match document.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        GitCheckpoint { dir }
    }

    pub fn message(operation: &str) -> String {
        format!("auto-consolidate {operation}")
    }
}

impl Checkpoint for GitCheckpoint {
    fn record(&mut self, operation: &str) -> Result<()> {
        let checkpoint_error = |message: String| Error::Checkpoint {
            operation: operation.to_string(),
            message,
        };
        let status = Command::new("git")
            .arg("commit")
            .arg("-am")
            .arg(Self::message(operation))
            .current_dir(&self.dir)
            .status()
            .map_err(|e| checkpoint_error(e.to_string()))?;
        if !status.success() {
            return Err(checkpoint_error(format!("git exited with {status}")));
        }
        Ok(())
    }
}

/// Checkpointing switched off
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCheckpoint;

impl Checkpoint for NoCheckpoint {
    fn record(&mut self, operation: &str) -> Result<()> {
        tracing::debug!("Not checkpointing {}", operation);
        Ok(())
    }
}

/// In-memory doubles for driving the pipeline in tests
#[cfg(test)]
pub(crate) mod memory {
    use super::{Checkpoint, DocumentStore, GitCheckpoint};
    use crate::error::Result;

    /// A document held in memory, counting how often it was written
    #[derive(Debug, Clone, Default)]
    pub struct MemoryStore {
        pub text: String,
        pub writes: usize,
    }

    impl MemoryStore {
        pub fn new(text: impl Into<String>) -> Self {
            MemoryStore {
                text: text.into(),
                writes: 0,
            }
        }
    }

    impl DocumentStore for MemoryStore {
        fn load(&mut self) -> Result<String> {
            Ok(self.text.clone())
        }

        fn store(&mut self, text: &str) -> Result<()> {
            self.text = text.to_string();
            self.writes += 1;
            Ok(())
        }
    }

    /// Remembers every checkpoint label, in order
    #[derive(Debug, Clone, Default)]
    pub struct RecordingCheckpoint {
        pub labels: Vec<String>,
    }

    impl Checkpoint for RecordingCheckpoint {
        fn record(&mut self, operation: &str) -> Result<()> {
            self.labels.push(GitCheckpoint::message(operation));
            Ok(())
        }
    }
}

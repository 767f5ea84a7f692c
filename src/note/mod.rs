//! Local note store abstraction.
//!
//! A note is a line-oriented markdown file whose checkbox lines are tasks. Tasks
//! have no identity beyond their position, so every [`LocalTask`] carries the line
//! index it was read from, valid only until the note is next modified.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub mod daily;
pub mod parser;

/// Error types for note operations.
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("Note not found: {0}")]
    NotFound(PathBuf),

    #[error("Line {line} is out of range for {path} ({len} lines)")]
    LineOutOfRange { path: PathBuf, line: usize, len: usize },

    #[error("Line {line} of {path} is not a task")]
    NotATask { path: PathBuf, line: usize },

    #[error("Invalid note filename format '{0}'")]
    InvalidFormat(String),

    #[error("Note IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NoteError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            NoteError::NotFound(path.to_path_buf())
        } else {
            NoteError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// A checkbox line read from a note.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalTask {
    pub title: String,
    pub completed: bool,
    pub line_index: usize,
    pub completion_date: Option<NaiveDate>,
    /// Id of the remote task this line was synced with, if linked
    pub remote_id: Option<String>,
}

/// Result of making sure today's note exists.
#[derive(Clone, Debug)]
pub struct NoteHandle {
    pub path: PathBuf,
    /// Whether the note was created by this call
    pub created: bool,
}

/// Store giving access to the daily note.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// The date this store considers today.
    fn today(&self) -> NaiveDate;

    /// Path of the note for `date`, whether or not it exists yet.
    fn path_for_date(&self, date: NaiveDate) -> PathBuf;

    /// Path of today's note, whether or not it exists yet.
    fn today_path(&self) -> PathBuf {
        self.path_for_date(self.today())
    }

    /// Create the note for `date` from the template if it is missing.
    async fn ensure_note(&self, date: NaiveDate) -> Result<NoteHandle, NoteError>;

    /// Create today's note from the template if it is missing.
    async fn ensure_today_note(&self) -> Result<NoteHandle, NoteError> {
        self.ensure_note(self.today()).await
    }

    /// Parse every checkbox line of the note.
    async fn list_tasks(&self, path: &Path) -> Result<Vec<LocalTask>, NoteError>;

    /// Insert an unchecked task line into the task section, creating the section if absent.
    async fn append_task(&self, path: &Path, title: &str, remote_id: Option<&str>) -> Result<(), NoteError>;

    /// Check the task at `line_index` and stamp it with `date`.
    async fn mark_completed(&self, path: &Path, line_index: usize, date: NaiveDate) -> Result<(), NoteError>;

    /// Attach a remote task id to the task at `line_index`.
    async fn link_remote_id(&self, path: &Path, line_index: usize, remote_id: &str) -> Result<(), NoteError>;

    /// Calendar date of the note's last modification.
    async fn modified_date(&self, path: &Path) -> Result<NaiveDate, NoteError>;
}

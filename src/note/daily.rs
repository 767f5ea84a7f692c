//! Filesystem-backed daily notes.
//!
//! One markdown file per day under the configured directory. Every mutation reads
//! the whole file, edits the line array and writes it back.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::fs;

use super::parser::{self, TaskLine};
use super::{LocalTask, NoteError, NoteHandle, NoteStore};
use crate::config::NoteConfig;
use crate::utils::datetime;

/// Note store writing one markdown file per day.
pub struct DailyNoteStore {
    config: NoteConfig,
    /// Fixed "today", used by tests and backfills
    date_override: Option<NaiveDate>,
}

/// A note split into lines, remembering the line ending it was written with.
struct NoteLines {
    lines: Vec<String>,
    line_ending: &'static str,
}

impl DailyNoteStore {
    /// Create a store for `config`.
    ///
    /// # Errors
    /// Returns [`NoteError::InvalidFormat`] if `filename_format` cannot render a date.
    pub fn new(config: NoteConfig) -> Result<Self, NoteError> {
        if datetime::render_date(datetime::today(), &config.filename_format).map_or(true, |name| name.is_empty()) {
            return Err(NoteError::InvalidFormat(config.filename_format));
        }
        Ok(Self {
            config,
            date_override: None,
        })
    }

    /// Store whose "today" is always `date`.
    pub fn for_date(config: NoteConfig, date: NaiveDate) -> Result<Self, NoteError> {
        Ok(Self {
            date_override: Some(date),
            ..Self::new(config)?
        })
    }

    fn render_template(&self, date: NaiveDate) -> String {
        let mut content = self.config.template.replace("{date}", &datetime::format_ymd(date));
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content
    }

    async fn read_lines(&self, path: &Path) -> Result<NoteLines, NoteError> {
        let content = fs::read_to_string(path).await.map_err(|e| NoteError::io(path, e))?;
        Ok(NoteLines {
            lines: content.lines().map(str::to_string).collect(),
            line_ending: if content.contains("\r\n") { "\r\n" } else { "\n" },
        })
    }

    async fn write_lines(&self, path: &Path, note: &NoteLines) -> Result<(), NoteError> {
        let mut content = note.lines.join(note.line_ending);
        content.push_str(note.line_ending);
        fs::write(path, content).await.map_err(|e| NoteError::io(path, e))
    }

    /// Rewrite the task at `line_index` with `edit`.
    async fn rewrite_task_line<F>(&self, path: &Path, line_index: usize, edit: F) -> Result<(), NoteError>
    where
        F: FnOnce(&mut TaskLine) + Send,
    {
        let mut note = self.read_lines(path).await?;
        let len = note.lines.len();
        let line = note.lines.get_mut(line_index).ok_or_else(|| NoteError::LineOutOfRange {
            path: path.to_path_buf(),
            line: line_index,
            len,
        })?;

        let mut task = TaskLine::parse(line).ok_or_else(|| NoteError::NotATask {
            path: path.to_path_buf(),
            line: line_index,
        })?;
        edit(&mut task);
        *line = task.compose();

        self.write_lines(path, &note).await
    }
}

#[async_trait]
impl NoteStore for DailyNoteStore {
    fn today(&self) -> NaiveDate {
        self.date_override.unwrap_or_else(datetime::today)
    }

    fn path_for_date(&self, date: NaiveDate) -> PathBuf {
        let name = datetime::render_date(date, &self.config.filename_format)
            .unwrap_or_else(|| datetime::format_ymd(date));
        self.config.directory.join(format!("{name}.md"))
    }

    async fn ensure_note(&self, date: NaiveDate) -> Result<NoteHandle, NoteError> {
        let path = self.path_for_date(date);
        if fs::try_exists(&path).await.map_err(|e| NoteError::io(&path, e))? {
            return Ok(NoteHandle { path, created: false });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| NoteError::io(parent, e))?;
        }
        fs::write(&path, self.render_template(date))
            .await
            .map_err(|e| NoteError::io(&path, e))?;

        info!("📝 Created daily note {}", path.display());
        Ok(NoteHandle { path, created: true })
    }

    async fn list_tasks(&self, path: &Path) -> Result<Vec<LocalTask>, NoteError> {
        let content = fs::read_to_string(path).await.map_err(|e| NoteError::io(path, e))?;
        let tasks = parser::parse_tasks(&content);
        debug!("Parsed {} tasks from {}", tasks.len(), path.display());
        Ok(tasks)
    }

    async fn append_task(&self, path: &Path, title: &str, remote_id: Option<&str>) -> Result<(), NoteError> {
        let mut note = self.read_lines(path).await?;
        let line = TaskLine::new(title, remote_id).compose();
        parser::insert_into_section(&mut note.lines, &self.config.task_section, line);
        self.write_lines(path, &note).await
    }

    async fn mark_completed(&self, path: &Path, line_index: usize, date: NaiveDate) -> Result<(), NoteError> {
        self.rewrite_task_line(path, line_index, |task| {
            task.completed = true;
            task.completion_date = Some(date);
        })
        .await
    }

    async fn link_remote_id(&self, path: &Path, line_index: usize, remote_id: &str) -> Result<(), NoteError> {
        let remote_id = remote_id.to_string();
        self.rewrite_task_line(path, line_index, move |task| task.remote_id = Some(remote_id))
            .await
    }

    async fn modified_date(&self, path: &Path) -> Result<NaiveDate, NoteError> {
        let metadata = fs::metadata(path).await.map_err(|e| NoteError::io(path, e))?;
        let modified = metadata.modified().map_err(|e| NoteError::io(path, e))?;
        Ok(datetime::local_date_of(modified))
    }
}

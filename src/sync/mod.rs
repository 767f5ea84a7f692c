//! Synchronization engine between the remote task list and today's note.
//!
//! This module provides the [`SyncEngine`] struct which reconciles tasks between a
//! remote [`Backend`] and a [`NoteStore`]. A full sync runs three phases in order:
//!
//! 1. remote → note: append remote tasks missing from the note
//! 2. note → remote: create remote tasks for open note tasks missing remotely
//! 3. completions: propagate checked state in both directions
//!
//! Each phase fetches its own snapshots and never reuses line indexes from an
//! earlier read. Failures on one item are recorded and the phase moves on; a
//! failure that prevents the phase from running is reported as a single error and
//! the next phase still runs. The engine never returns `Err` to its caller.

pub mod completions;
pub mod local_to_remote;
pub mod matcher;
pub mod remote_to_local;
pub mod report;
pub mod single_flight;

use chrono::NaiveDate;
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::backend::{Backend, BackendError};
use crate::config::SyncConfig;
use crate::constants::{ERROR_SYNC_IN_PROGRESS, ERROR_SYNC_PARTIAL, SUCCESS_SYNC_COMPLETE};
use crate::note::{NoteError, NoteStore};

pub use report::{SyncPhaseResult, SyncResult};
pub use single_flight::SingleFlight;

/// Failure that stops a whole phase.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Note(#[from] NoteError),
}

/// State of one sync invocation, passed through its phases.
///
/// The note date is resolved once so that every phase of a run addresses the
/// same note, even if the date changes mid-run.
#[derive(Clone, Debug)]
pub struct SyncContext {
    pub date: NaiveDate,
    pub note_path: PathBuf,
}

/// Engine reconciling a remote task list with the daily note.
///
/// Clones share the collaborators and the single-flight registry.
///
/// # Example
/// ```rust,no_run
/// use daynote_sync::backend::memory::MemoryBackend;
/// use daynote_sync::config::NoteConfig;
/// use daynote_sync::note::daily::DailyNoteStore;
/// use daynote_sync::sync::SyncEngine;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), daynote_sync::note::NoteError> {
/// let backend = Arc::new(MemoryBackend::new());
/// let notes = Arc::new(DailyNoteStore::new(NoteConfig::default())?);
/// let engine = SyncEngine::new(backend, notes);
///
/// let result = engine.perform_full_sync().await;
/// println!("{}", result.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SyncEngine {
    backend: Arc<dyn Backend>,
    notes: Arc<dyn NoteStore>,
    in_flight: SingleFlight,
    link_remote_ids: bool,
}

impl SyncEngine {
    pub fn new(backend: Arc<dyn Backend>, notes: Arc<dyn NoteStore>) -> Self {
        Self {
            backend,
            notes,
            in_flight: SingleFlight::new(),
            link_remote_ids: true,
        }
    }

    /// Build an engine honoring the `[sync]` configuration section.
    pub fn from_config(config: &SyncConfig, backend: Arc<dyn Backend>, notes: Arc<dyn NoteStore>) -> Self {
        Self::new(backend, notes).with_link_remote_ids(config.link_remote_ids)
    }

    /// Whether synced lines carry their remote task id.
    pub fn with_link_remote_ids(mut self, link: bool) -> Self {
        self.link_remote_ids = link;
        self
    }

    /// Share a single-flight registry with other engines.
    pub fn with_single_flight(mut self, in_flight: SingleFlight) -> Self {
        self.in_flight = in_flight;
        self
    }

    /// Whether a sync of today's note is currently running.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.is_in_flight(&self.notes.today_path())
    }

    fn begin(&self) -> SyncContext {
        let date = self.notes.today();
        SyncContext {
            date,
            note_path: self.notes.path_for_date(date),
        }
    }

    fn busy_message(ctx: &SyncContext) -> String {
        format!("{} {}", ERROR_SYNC_IN_PROGRESS, ctx.note_path.display())
    }

    /// Runs all three phases in order and merges their results.
    ///
    /// If another sync of the same note is in flight, returns immediately with
    /// `success == false` without touching either store.
    pub async fn perform_full_sync(&self) -> SyncResult {
        let ctx = self.begin();
        let Some(_guard) = self.in_flight.try_acquire(&ctx.note_path) else {
            warn!("⏳ Sync skipped: already running for {}", ctx.note_path.display());
            return SyncResult::rejected(Self::busy_message(&ctx));
        };

        info!(
            "🔄 Starting sync of {} with {} backend",
            ctx.note_path.display(),
            self.backend.backend_type()
        );
        let remote_to_local = self.remote_to_local(&ctx).await;
        let local_to_remote = self.local_to_remote(&ctx).await;
        let completions = self.completions(&ctx).await;

        let result = SyncResult::from_phases(remote_to_local, local_to_remote, completions);
        if result.success {
            info!("{}: {}", SUCCESS_SYNC_COMPLETE, result.summary());
        } else {
            warn!("{}: {}", ERROR_SYNC_PARTIAL, result.summary());
        }
        result
    }

    /// Runs only the remote → note phase.
    pub async fn sync_remote_to_local(&self) -> SyncPhaseResult {
        let ctx = self.begin();
        match self.in_flight.try_acquire(&ctx.note_path) {
            Some(_guard) => self.remote_to_local(&ctx).await,
            None => SyncPhaseResult::failed(Self::busy_message(&ctx)),
        }
    }

    /// Runs only the note → remote phase.
    pub async fn sync_local_to_remote(&self) -> SyncPhaseResult {
        let ctx = self.begin();
        match self.in_flight.try_acquire(&ctx.note_path) {
            Some(_guard) => self.local_to_remote(&ctx).await,
            None => SyncPhaseResult::failed(Self::busy_message(&ctx)),
        }
    }

    /// Runs only the completion phase.
    pub async fn sync_completions(&self) -> SyncPhaseResult {
        let ctx = self.begin();
        match self.in_flight.try_acquire(&ctx.note_path) {
            Some(_guard) => self.completions(&ctx).await,
            None => SyncPhaseResult::failed(Self::busy_message(&ctx)),
        }
    }

    /// Turn a phase-level failure into a single aggregate error.
    fn phase_outcome(phase: &str, outcome: Result<SyncPhaseResult, SyncError>) -> SyncPhaseResult {
        match outcome {
            Ok(result) => {
                info!("✅ {phase}: {} applied, {} errors", result.created, result.errors.len());
                result
            }
            Err(e) => {
                error!("❌ {phase} failed: {e}");
                SyncPhaseResult::failed(format!("{phase} failed: {e}"))
            }
        }
    }
}

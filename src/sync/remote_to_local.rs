use log::{debug, info, warn};

use crate::constants::LOG_PHASE_REMOTE_TO_LOCAL;
use crate::sync::matcher;
use crate::sync::{SyncContext, SyncEngine, SyncError, SyncPhaseResult};

impl SyncEngine {
    pub(crate) async fn remote_to_local(&self, ctx: &SyncContext) -> SyncPhaseResult {
        info!("{LOG_PHASE_REMOTE_TO_LOCAL}");
        Self::phase_outcome("Remote to note sync", self.try_remote_to_local(ctx).await)
    }

    /// Appends every remote task missing from the note.
    ///
    /// Appends do not depend on line indexes, so one snapshot of the note is
    /// enough for the whole phase.
    async fn try_remote_to_local(&self, ctx: &SyncContext) -> Result<SyncPhaseResult, SyncError> {
        let remote_tasks = self.backend.fetch_tasks().await?;
        let note = self.notes.ensure_note(ctx.date).await?;
        if note.created {
            debug!("Syncing into the new note for {}", ctx.date);
        }
        let local_tasks = self.notes.list_tasks(&ctx.note_path).await?;

        let new_remote = matcher::find_new_remote(&remote_tasks, &local_tasks);
        debug!(
            "{} remote tasks, {} note tasks, {} missing from note",
            remote_tasks.len(),
            local_tasks.len(),
            new_remote.len()
        );

        let mut result = SyncPhaseResult::default();
        for task in new_remote {
            let remote_id = self.link_remote_ids.then_some(task.remote_id.as_str());
            match self.notes.append_task(&ctx.note_path, &task.title, remote_id).await {
                Ok(()) => {
                    debug!("Added '{}' to note", task.title);
                    result.record_success();
                }
                Err(e) => {
                    warn!("Failed to add '{}' to note: {e}", task.title);
                    result.record_error(format!("Failed to add '{}' to note: {e}", task.title));
                }
            }
        }

        Ok(result)
    }
}

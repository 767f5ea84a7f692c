use log::{debug, info, warn};

use crate::backend::CreateTaskArgs;
use crate::constants::LOG_PHASE_LOCAL_TO_REMOTE;
use crate::note::LocalTask;
use crate::sync::matcher;
use crate::sync::{SyncContext, SyncEngine, SyncError, SyncPhaseResult};

impl SyncEngine {
    pub(crate) async fn local_to_remote(&self, ctx: &SyncContext) -> SyncPhaseResult {
        info!("{LOG_PHASE_LOCAL_TO_REMOTE}");
        Self::phase_outcome("Note to remote sync", self.try_local_to_remote(ctx).await)
    }

    /// Creates a remote task for every open note task missing remotely.
    ///
    /// All tasks created in one call share the note's modification date as their
    /// start date.
    async fn try_local_to_remote(&self, ctx: &SyncContext) -> Result<SyncPhaseResult, SyncError> {
        let incomplete: Vec<LocalTask> = self
            .notes
            .list_tasks(&ctx.note_path)
            .await?
            .into_iter()
            .filter(|t| !t.completed)
            .collect();

        if incomplete.is_empty() {
            debug!("No open tasks in note; skipping remote fetch");
            return Ok(SyncPhaseResult::default());
        }

        let remote_tasks = self.backend.fetch_tasks().await?;
        let new_local = matcher::find_new_local(&incomplete, &remote_tasks);
        if new_local.is_empty() {
            return Ok(SyncPhaseResult::default());
        }

        let start_date = self.notes.modified_date(&ctx.note_path).await?;
        debug!("{} note tasks missing remotely, start date {start_date}", new_local.len());

        let mut result = SyncPhaseResult::default();
        for task in new_local {
            let args = CreateTaskArgs::new(task.title.clone(), Some(start_date));
            match self.backend.create_task(args).await {
                Ok(created) => {
                    debug!("Created remote task '{}' ({})", created.title, created.remote_id);
                    result.record_success();
                    if self.link_remote_ids {
                        self.link_created_task(ctx, task, &created.remote_id).await;
                    }
                }
                Err(e) => {
                    warn!("Failed to create remote task '{}': {e}", task.title);
                    result.record_error(format!("Failed to create remote task '{}': {e}", task.title));
                }
            }
        }

        Ok(result)
    }

    /// Writes the new remote id onto the note line the task came from.
    ///
    /// The line is located again in a fresh read of the note. A failed link only
    /// costs the id, the title still matches on the next sync.
    async fn link_created_task(&self, ctx: &SyncContext, task: &LocalTask, remote_id: &str) {
        let fresh = match self.notes.list_tasks(&ctx.note_path).await {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("Could not re-read note to link '{}': {e}", task.title);
                return;
            }
        };

        let title = matcher::normalize_title(&task.title);
        let line = fresh
            .iter()
            .filter(|t| t.remote_id.is_none() && matcher::normalize_title(&t.title) == title)
            .min_by_key(|t| t.line_index.abs_diff(task.line_index));

        match line {
            Some(line) => {
                if let Err(e) = self.notes.link_remote_id(&ctx.note_path, line.line_index, remote_id).await {
                    warn!("Could not link '{}' to {remote_id}: {e}", task.title);
                }
            }
            None => warn!("Line for '{}' disappeared before it could be linked", task.title),
        }
    }
}

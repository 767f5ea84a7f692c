use log::{debug, info, warn};
use std::collections::HashSet;

use crate::backend::BackendTask;
use crate::constants::LOG_PHASE_COMPLETIONS;
use crate::note::LocalTask;
use crate::sync::matcher;
use crate::sync::{SyncContext, SyncEngine, SyncError, SyncPhaseResult};
use crate::utils::datetime;

impl SyncEngine {
    pub(crate) async fn completions(&self, ctx: &SyncContext) -> SyncPhaseResult {
        info!("{LOG_PHASE_COMPLETIONS}");
        Self::phase_outcome("Completion sync", self.try_completions(ctx).await)
    }

    /// Propagates checked state: remote completions onto the note first, then
    /// note completions onto the remote list.
    async fn try_completions(&self, ctx: &SyncContext) -> Result<SyncPhaseResult, SyncError> {
        let local_tasks = self.notes.list_tasks(&ctx.note_path).await?;
        let remote_tasks = self.backend.fetch_tasks().await?;

        let mut result = SyncPhaseResult::default();
        self.complete_in_note(ctx, &remote_tasks, &local_tasks, &mut result).await;
        self.complete_remotely(&remote_tasks, &local_tasks, &mut result).await;
        Ok(result)
    }

    async fn complete_in_note(
        &self,
        ctx: &SyncContext,
        remote_tasks: &[BackendTask],
        local_tasks: &[LocalTask],
        result: &mut SyncPhaseResult,
    ) {
        // Candidates come from the phase snapshot; each is looked up again in a
        // fresh read right before its line is rewritten.
        let candidates = remote_tasks.iter().filter_map(|remote| {
            let completed_at = remote.completed_at.filter(|_| remote.is_completed())?;
            matcher::find_local_match(remote, local_tasks).map(|_| (remote, completed_at))
        });

        for (remote, completed_at) in candidates {
            let date = datetime::truncate_to_date(completed_at);
            let outcome = async {
                let fresh = self.notes.list_tasks(&ctx.note_path).await?;
                match matcher::find_local_match(remote, &fresh) {
                    Some(line) => {
                        self.notes.mark_completed(&ctx.note_path, line.line_index, date).await?;
                        Ok::<bool, SyncError>(true)
                    }
                    None => Ok(false),
                }
            }
            .await;

            match outcome {
                Ok(true) => {
                    debug!("Marked '{}' completed in note on {date}", remote.title);
                    result.record_success();
                }
                Ok(false) => debug!("'{}' already completed in note", remote.title),
                Err(e) => {
                    warn!("Failed to mark '{}' completed in note: {e}", remote.title);
                    result.record_error(format!("Failed to mark '{}' completed in note: {e}", remote.title));
                }
            }
        }
    }

    async fn complete_remotely(
        &self,
        remote_tasks: &[BackendTask],
        local_tasks: &[LocalTask],
        result: &mut SyncPhaseResult,
    ) {
        let mut completed_ids = HashSet::new();
        for local in local_tasks.iter().filter(|t| t.completed) {
            let Some(remote) = matcher::find_remote_match(local, remote_tasks) else {
                continue;
            };
            // Two checked lines with one title point at the same remote task
            if !completed_ids.insert(remote.remote_id.as_str()) {
                continue;
            }

            match self.backend.complete_task(&remote.remote_id).await {
                Ok(()) => {
                    debug!("Completed remote task '{}' ({})", remote.title, remote.remote_id);
                    result.record_success();
                }
                Err(e) => {
                    warn!("Failed to complete remote task '{}': {e}", remote.title);
                    result.record_error(format!("Failed to complete remote task '{}': {e}", remote.title));
                }
            }
        }
    }
}

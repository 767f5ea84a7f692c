//! Sync outcome types.

use serde::Serialize;

/// Outcome of a single phase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncPhaseResult {
    /// Items created (or, for the completion phase, completions applied)
    pub created: usize,
    /// Human-readable failures, one per item or one for the whole phase
    pub errors: Vec<String>,
}

impl SyncPhaseResult {
    /// A phase that could not run at all.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            created: 0,
            errors: vec![message.into()],
        }
    }

    pub fn record_success(&mut self) {
        self.created += 1;
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Outcome of a full sync.
///
/// `success == false` is a partial failure: items reported in the counters were
/// synced even when errors are present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub success: bool,
    pub new_from_remote: usize,
    pub new_from_local: usize,
    pub completed_count: usize,
    pub errors: Vec<String>,
}

impl SyncResult {
    /// Merge the three phase results, in phase order.
    pub fn from_phases(
        remote_to_local: SyncPhaseResult,
        local_to_remote: SyncPhaseResult,
        completions: SyncPhaseResult,
    ) -> Self {
        let errors: Vec<String> = [remote_to_local.errors, local_to_remote.errors, completions.errors]
            .into_iter()
            .flatten()
            .collect();

        Self {
            success: errors.is_empty(),
            new_from_remote: remote_to_local.created,
            new_from_local: local_to_remote.created,
            completed_count: completions.created,
            errors,
        }
    }

    /// A sync that did not start.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![message.into()],
            ..Self::default()
        }
    }

    /// One-line summary for status output.
    pub fn summary(&self) -> String {
        format!(
            "Remote→note +{} | Note→remote +{} | Completed {} | Errors {}",
            self.new_from_remote,
            self.new_from_local,
            self.completed_count,
            self.errors.len()
        )
    }
}

//! Task matching between the remote list and the note.
//!
//! A note line linked to a remote id matches only that remote task. Unlinked
//! lines match by normalized title. No I/O happens here.

use log::warn;
use std::collections::HashSet;

use crate::backend::BackendTask;
use crate::note::parser::clean_title;
use crate::note::LocalTask;

/// Matching key for titles: trimmed and lowercased.
///
/// Titles are first reduced to what a note line can hold, so a remote title
/// matches the line it was written to.
pub fn normalize_title(title: &str) -> String {
    clean_title(title).to_lowercase()
}

/// Whether a note line and a remote task are the same task.
pub fn is_same_task(local: &LocalTask, remote: &BackendTask) -> bool {
    match &local.remote_id {
        Some(id) => *id == remote.remote_id,
        None => normalize_title(&local.title) == normalize_title(&remote.title),
    }
}

/// Remote tasks that have no counterpart in the note.
pub fn find_new_remote<'a>(remote_tasks: &'a [BackendTask], local_tasks: &[LocalTask]) -> Vec<&'a BackendTask> {
    let linked_ids: HashSet<&str> = local_tasks.iter().filter_map(|t| t.remote_id.as_deref()).collect();
    let titles: HashSet<String> = local_tasks
        .iter()
        .filter(|t| t.remote_id.is_none())
        .map(|t| normalize_title(&t.title))
        .collect();

    remote_tasks
        .iter()
        .filter(|r| !linked_ids.contains(r.remote_id.as_str()) && !titles.contains(&normalize_title(&r.title)))
        .collect()
}

/// Note tasks that have no counterpart in the remote list.
///
/// Callers pass only incomplete tasks. Linked lines are never reported: they were
/// synced before, and a remote task deleted elsewhere is not recreated. When
/// several lines share a normalized title only the first is reported; the rest
/// are treated as already synced.
pub fn find_new_local<'a>(local_tasks: &'a [LocalTask], remote_tasks: &[BackendTask]) -> Vec<&'a LocalTask> {
    let remote_titles: HashSet<String> = remote_tasks.iter().map(|r| normalize_title(&r.title)).collect();
    let mut seen = HashSet::new();
    let mut new_tasks = Vec::new();

    for task in local_tasks.iter().filter(|t| t.remote_id.is_none()) {
        let key = normalize_title(&task.title);
        if remote_titles.contains(&key) {
            continue;
        }
        if !seen.insert(key) {
            warn!(
                "Duplicate task '{}' on line {} skipped; only the first occurrence is synced",
                task.title, task.line_index
            );
            continue;
        }
        new_tasks.push(task);
    }

    new_tasks
}

/// First open note task matching `remote`.
pub fn find_local_match<'a>(remote: &BackendTask, local_tasks: &'a [LocalTask]) -> Option<&'a LocalTask> {
    local_tasks.iter().find(|l| !l.completed && is_same_task(l, remote))
}

/// First remote task matching `local` that is not completed yet.
pub fn find_remote_match<'a>(local: &LocalTask, remote_tasks: &'a [BackendTask]) -> Option<&'a BackendTask> {
    remote_tasks.iter().find(|r| !r.is_completed() && is_same_task(local, r))
}

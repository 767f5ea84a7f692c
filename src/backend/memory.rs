//! In-memory backend.
//!
//! Keeps tasks in a vector behind a mutex. Used by the test suite and for offline
//! dry runs; supports simulating an outage, per-title create failures and tasks
//! vanishing before they are completed.

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, NaiveTime};
use std::collections::HashSet;
use std::sync::Mutex;

use super::{Backend, BackendError, BackendTask, CreateTaskArgs, TaskStatus};

#[derive(Default)]
struct MemoryState {
    tasks: Vec<BackendTask>,
    next_id: u64,
    offline: bool,
    failing_titles: HashSet<String>,
    vanished_ids: HashSet<String>,
    fetch_calls: usize,
}

/// Backend holding its tasks in process memory.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with the given tasks.
    pub fn with_tasks(tasks: Vec<BackendTask>) -> Self {
        let backend = Self::new();
        if let Ok(mut state) = backend.state.lock() {
            state.next_id = tasks.len() as u64;
            state.tasks = tasks;
        }
        backend
    }

    /// Build a not-started task, handy for seeding.
    pub fn task(remote_id: &str, title: &str) -> BackendTask {
        BackendTask {
            remote_id: remote_id.to_string(),
            title: title.to_string(),
            status: TaskStatus::NotStarted,
            created_at: Local::now().naive_local(),
            start_at: None,
            due_at: None,
            completed_at: None,
        }
    }

    /// Build a completed task with the given completion timestamp.
    pub fn completed_task(remote_id: &str, title: &str, completed_at: NaiveDateTime) -> BackendTask {
        BackendTask {
            status: TaskStatus::Completed,
            completed_at: Some(completed_at),
            ..Self::task(remote_id, title)
        }
    }

    /// Simulate the service being unreachable.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.offline = offline;
        }
    }

    /// Make every create request for `title` fail with a network error.
    pub fn fail_create_for(&self, title: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.failing_titles.insert(title.to_string());
        }
    }

    /// Make completing `remote_id` fail with not-found, as if the task was
    /// deleted by another client after it was listed.
    pub fn fail_complete_for(&self, remote_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.vanished_ids.insert(remote_id.to_string());
        }
    }

    /// Remove a task as if it had been deleted by another client.
    pub fn remove_task(&self, remote_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.tasks.retain(|t| t.remote_id != remote_id);
        }
    }

    /// Snapshot of the stored tasks.
    pub fn tasks(&self) -> Vec<BackendTask> {
        self.state.lock().map(|state| state.tasks.clone()).unwrap_or_default()
    }

    /// Number of `fetch_tasks` calls served so far, including failed ones.
    pub fn fetch_calls(&self) -> usize {
        self.state.lock().map(|state| state.fetch_calls).unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, BackendError> {
        self.state
            .lock()
            .map_err(|_| BackendError::Other("memory backend state poisoned".to_string()))
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn fetch_tasks(&self) -> Result<Vec<BackendTask>, BackendError> {
        let mut state = self.lock()?;
        state.fetch_calls += 1;
        if state.offline {
            return Err(BackendError::Network("memory backend is offline".to_string()));
        }
        Ok(state.tasks.clone())
    }

    async fn create_task(&self, args: CreateTaskArgs) -> Result<BackendTask, BackendError> {
        args.validate()?;

        let mut state = self.lock()?;
        if state.offline {
            return Err(BackendError::Network("memory backend is offline".to_string()));
        }
        if state.failing_titles.contains(&args.title) {
            return Err(BackendError::Network(format!("simulated failure creating '{}'", args.title)));
        }

        state.next_id += 1;
        let task = BackendTask {
            remote_id: state.next_id.to_string(),
            title: args.title,
            status: TaskStatus::NotStarted,
            created_at: Local::now().naive_local(),
            start_at: args.start_date.map(|d| d.and_time(NaiveTime::MIN)),
            due_at: None,
            completed_at: None,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn complete_task(&self, remote_id: &str) -> Result<(), BackendError> {
        let mut state = self.lock()?;
        if state.offline {
            return Err(BackendError::Network("memory backend is offline".to_string()));
        }
        if state.vanished_ids.contains(remote_id) {
            return Err(BackendError::NotFound(format!("task {remote_id}")));
        }
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.remote_id == remote_id)
            .ok_or_else(|| BackendError::NotFound(format!("task {remote_id}")))?;
        task.status = TaskStatus::Completed;
        task.completed_at = Some(Local::now().naive_local());
        Ok(())
    }
}

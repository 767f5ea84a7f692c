//! Remote task store abstraction.
//!
//! This module defines the interface the sync engine uses to talk to a hosted
//! task list, along with the backend-agnostic task representation and error type.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod factory;
pub mod memory;
pub mod microsoft_todo;

/// Common error types for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Backend error: {0}")]
    Other(String),
}

/// Lifecycle state of a remote task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Backend-agnostic task representation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackendTask {
    pub remote_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
    pub start_at: Option<NaiveDateTime>,
    pub due_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

impl BackendTask {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Arguments for creating a new task.
#[derive(Clone, Debug)]
pub struct CreateTaskArgs {
    pub title: String,
    pub start_date: Option<NaiveDate>,
}

impl CreateTaskArgs {
    pub fn new(title: impl Into<String>, start_date: Option<NaiveDate>) -> Self {
        Self {
            title: title.into(),
            start_date,
        }
    }

    /// Rejects blank titles. Backends call this before issuing any request.
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.title.trim().is_empty() {
            return Err(BackendError::InvalidData("task title cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Backend trait that all remote task stores must implement.
///
/// The sync engine only needs to list, create and complete tasks on a single list,
/// so the trait is limited to those operations.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the backend type identifier (e.g., "microsoft_todo", "memory").
    fn backend_type(&self) -> &str;

    async fn fetch_tasks(&self) -> Result<Vec<BackendTask>, BackendError>;
    async fn create_task(&self, args: CreateTaskArgs) -> Result<BackendTask, BackendError>;
    async fn complete_task(&self, remote_id: &str) -> Result<(), BackendError>;
}

//! Microsoft To Do backend implementation over the Graph API.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Backend, BackendError, BackendTask, CreateTaskArgs, TaskStatus};
use crate::utils::datetime;

/// Default Graph API root.
pub const GRAPH_API: &str = "https://graph.microsoft.com/v1.0";

#[derive(Debug, Deserialize)]
struct TaskListResponse {
    #[serde(default)]
    value: Vec<GraphTask>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphTask {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    status: String,
    created_date_time: Option<String>,
    start_date_time: Option<DateTimeTimeZone>,
    due_date_time: Option<DateTimeTimeZone>,
    completed_date_time: Option<DateTimeTimeZone>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DateTimeTimeZone {
    date_time: String,
    time_zone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskRequest {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date_time: Option<DateTimeTimeZone>,
}

#[derive(Debug, Serialize)]
struct CompleteTaskRequest {
    status: &'static str,
}

/// Microsoft To Do backend bound to a single task list.
pub struct MicrosoftTodoBackend {
    client: Client,
    base_url: String,
    list_id: String,
    access_token: String,
}

impl MicrosoftTodoBackend {
    /// Create a backend for `list_id`, authenticating with a bearer token.
    ///
    /// Every request is bounded by `timeout`; a timed-out request surfaces as a
    /// [`BackendError::Network`].
    pub fn new(
        base_url: &str,
        list_id: String,
        access_token: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| BackendError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            list_id,
            access_token,
        })
    }

    fn tasks_url(&self) -> String {
        format!("{}/me/todo/lists/{}/tasks", self.base_url, self.list_id)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, BackendError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| BackendError::Network(format!("{what}: {e}")))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(BackendError::Auth(format!("{what}: HTTP {}", response.status())))
            }
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(what.to_string())),
            status if !status.is_success() => Err(BackendError::Network(format!("{what}: HTTP {status}"))),
            _ => Ok(response),
        }
    }

    // Helper: Transform Graph task → Backend task
    fn task_to_backend(task: GraphTask) -> BackendTask {
        let parse = |value: Option<DateTimeTimeZone>| value.and_then(|v| datetime::parse_remote_timestamp(&v.date_time));

        BackendTask {
            created_at: task
                .created_date_time
                .as_deref()
                .and_then(datetime::parse_remote_timestamp)
                .unwrap_or_default(),
            start_at: parse(task.start_date_time),
            due_at: parse(task.due_date_time),
            completed_at: parse(task.completed_date_time),
            status: status_from_graph(&task.status),
            remote_id: task.id,
            title: task.title,
        }
    }
}

/// Map a Graph `taskStatus` value onto the three states the sync cares about.
fn status_from_graph(status: &str) -> TaskStatus {
    match status {
        "completed" => TaskStatus::Completed,
        "inProgress" | "waitingOnOthers" | "deferred" => TaskStatus::InProgress,
        _ => TaskStatus::NotStarted,
    }
}

#[async_trait]
impl Backend for MicrosoftTodoBackend {
    fn backend_type(&self) -> &str {
        "microsoft_todo"
    }

    async fn fetch_tasks(&self) -> Result<Vec<BackendTask>, BackendError> {
        let mut tasks = Vec::new();
        let mut url = self.tasks_url();

        loop {
            let response = self.send(self.client.get(&url), "list tasks").await?;
            let page: TaskListResponse = response
                .json()
                .await
                .map_err(|e| BackendError::InvalidData(format!("list tasks: {e}")))?;

            tasks.extend(page.value.into_iter().map(Self::task_to_backend));
            match page.next_link {
                Some(next) => url = next,
                None => break,
            }
        }

        debug!("Fetched {} tasks from list {}", tasks.len(), self.list_id);
        Ok(tasks)
    }

    async fn create_task(&self, args: CreateTaskArgs) -> Result<BackendTask, BackendError> {
        args.validate()?;

        let body = CreateTaskRequest {
            title: args.title,
            start_date_time: args.start_date.map(|d| DateTimeTimeZone {
                date_time: datetime::format_remote_date(d),
                time_zone: "UTC".to_string(),
            }),
        };

        let response = self
            .send(self.client.post(self.tasks_url()).json(&body), "create task")
            .await?;
        let created: GraphTask = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidData(format!("create task: {e}")))?;
        Ok(Self::task_to_backend(created))
    }

    async fn complete_task(&self, remote_id: &str) -> Result<(), BackendError> {
        let url = format!("{}/{}", self.tasks_url(), remote_id);
        let body = CompleteTaskRequest { status: "completed" };
        self.send(self.client.patch(url).json(&body), &format!("complete task {remote_id}"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_task_list_page_parsing() {
        let json = r#"{
            "value": [{
                "id": "AAMk1",
                "title": "Buy milk",
                "status": "completed",
                "createdDateTime": "2024-01-01T08:30:00.1234567Z",
                "completedDateTime": {"dateTime": "2024-01-02T10:00:00.0000000", "timeZone": "UTC"}
            }, {
                "id": "AAMk2",
                "title": "Call mom",
                "status": "waitingOnOthers"
            }],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/next"
        }"#;

        let page: TaskListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_link.as_deref(), Some("https://graph.microsoft.com/v1.0/next"));

        let tasks: Vec<BackendTask> = page.value.into_iter().map(MicrosoftTodoBackend::task_to_backend).collect();
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(
            tasks[0].completed_at.unwrap().date(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(tasks[0].created_at.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(tasks[1].status, TaskStatus::InProgress);
        assert!(tasks[1].completed_at.is_none());
    }

    #[test]
    fn test_create_request_omits_missing_start() {
        let body = CreateTaskRequest {
            title: "Write report".to_string(),
            start_date_time: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"title":"Write report"}"#);
    }

    #[test]
    fn test_create_request_start_date() {
        let body = CreateTaskRequest {
            title: "Write report".to_string(),
            start_date_time: Some(DateTimeTimeZone {
                date_time: datetime::format_remote_date(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()),
                time_zone: "UTC".to_string(),
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["startDateTime"]["dateTime"], "2024-05-06T00:00:00");
        assert_eq!(json["startDateTime"]["timeZone"], "UTC");
    }

    #[test]
    fn test_unknown_status_is_not_started() {
        assert_eq!(status_from_graph("notStarted"), TaskStatus::NotStarted);
        assert_eq!(status_from_graph("something"), TaskStatus::NotStarted);
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::response::PaginationMeta;

/// Lifecycle state of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Priority of a task. Persisted as an ordinal rank (low=1, medium=2,
/// high=3) so storage-level sort-by-priority is numerically meaningful.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn rank(&self) -> i32 {
        match self {
            TaskPriority::Low => 1,
            TaskPriority::Medium => 2,
            TaskPriority::High => 3,
        }
    }

    pub fn from_rank(rank: i32) -> Option<Self> {
        match rank {
            1 => Some(TaskPriority::Low),
            2 => Some(TaskPriority::Medium),
            3 => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Serde adapter persisting [`TaskPriority`] as its ordinal rank.
mod priority_rank {
    use super::TaskPriority;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &TaskPriority, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.rank().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TaskPriority, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rank = i32::deserialize(deserializer)?;
        TaskPriority::from_rank(rank)
            .ok_or_else(|| de::Error::custom(format!("invalid priority rank {}", rank)))
    }
}

/// A task document as stored in the `tasks` collection.
///
/// An empty `description` means "not set"; `due_date` is absent unless a
/// client provided one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(with = "priority_rank")]
    pub priority: TaskPriority,
    #[serde(default, with = "crate::models::bson_datetime_option")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        title: &str,
        description: &str,
        status: TaskStatus,
        priority: TaskPriority,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            title: title.to_string(),
            description: description.to_string(),
            status,
            priority,
            due_date,
            created_at: now,
            updated_at: now,
        }
    }
}

fn lenient_rfc3339<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    // "" and null both mean "no due date supplied".
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|parsed| Some(parsed.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

/// Payload for `POST /api/v1/tasks`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(required, length(min = 3, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom = "crate::validation::validate_status")]
    pub status: Option<String>,
    #[validate(custom = "crate::validation::validate_priority")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_rfc3339")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Payload for `PUT /api/v1/tasks/{id}`. Every field is
/// overwrite-if-provided: an empty or omitted value leaves the stored field
/// unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(custom = "crate::validation::validate_optional_title")]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom = "crate::validation::validate_status")]
    pub status: Option<String>,
    #[validate(custom = "crate::validation::validate_priority")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_rfc3339")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Query parameters for `GET /api/v1/tasks`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskQueryParams {
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    #[validate(custom = "crate::validation::validate_status")]
    pub status: Option<String>,
    #[validate(custom = "crate::validation::validate_priority")]
    pub priority: Option<String>,
    pub search: Option<String>,
    pub due_date_from: Option<String>,
    pub due_date_to: Option<String>,
    #[validate(custom = "crate::validation::validate_sort_by")]
    pub sort_by: Option<String>,
    #[validate(custom = "crate::validation::validate_sort_order")]
    pub sort_order: Option<String>,
}

/// Client-facing view of a task.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_hex(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.as_str().to_string(),
            priority: task.priority.as_str().to_string(),
            due_date: task.due_date,
            created_at: task.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            updated_at: task.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Listing payload: the matching page of tasks plus pagination meta.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub meta: PaginationMeta,
}

impl TaskListResponse {
    pub fn new(tasks: &[Task], meta: PaginationMeta) -> Self {
        Self {
            tasks: tasks.iter().map(TaskResponse::from).collect(),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_priority_rank_round_trip() {
        for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(TaskPriority::from_rank(priority.rank()), Some(priority));
        }
        assert_eq!(TaskPriority::from_rank(0), None);
        assert_eq!(TaskPriority::from_rank(4), None);
    }

    #[test]
    fn test_status_and_priority_names() {
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("done"), None);
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskPriority::parse("high"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse("urgent"), None);
    }

    #[test]
    fn test_new_task_defaults_from_arguments() {
        let task = Task::new(
            "Write report",
            "",
            TaskStatus::Pending,
            TaskPriority::Medium,
            None,
        );
        assert_eq!(task.created_at, task.updated_at);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_create_request_accepts_empty_due_date_string() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "Write report", "due_date": ""}"#).unwrap();
        assert!(req.due_date.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_parses_rfc3339_due_date() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "Write report", "due_date": "2030-01-02T03:04:05Z"}"#)
                .unwrap();
        let due = req.due_date.unwrap();
        assert_eq!(due.to_rfc3339_opts(SecondsFormat::Secs, true), "2030-01-02T03:04:05Z");
    }

    #[test]
    fn test_create_request_validation_bounds() {
        let missing: CreateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.validate().is_err());

        let short: CreateTaskRequest = serde_json::from_str(r#"{"title": "ab"}"#).unwrap();
        assert!(short.validate().is_err());

        let bad_status: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "Write report", "status": "done"}"#).unwrap();
        assert!(bad_status.validate().is_err());

        let valid: CreateTaskRequest = serde_json::from_str(
            r#"{"title": "Write report", "status": "completed", "priority": "low"}"#,
        )
        .unwrap();
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_update_request_allows_empty_title() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_ok());

        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title": "ab"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_task_serializes_priority_as_rank() {
        let task = Task::new(
            "Write report",
            "quarterly numbers",
            TaskStatus::InProgress,
            TaskPriority::High,
            None,
        );
        let doc = mongodb::bson::to_document(&task).unwrap();
        assert_eq!(doc.get_i32("priority").unwrap(), 3);
        assert_eq!(doc.get_str("status").unwrap(), "in_progress");
        assert!(doc.get_object_id("_id").is_ok());

        let back: Task = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(back.priority, TaskPriority::High);
        assert_eq!(back.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_task_response_uses_symbolic_priority() {
        let task = Task::new(
            "Write report",
            "",
            TaskStatus::Pending,
            TaskPriority::High,
            None,
        );
        let response = TaskResponse::from(&task);
        assert_eq!(response.priority, "high");
        assert_eq!(response.status, "pending");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("due_date").is_none());
    }
}

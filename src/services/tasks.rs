//! Task business rules: creation defaults, due-date checks, partial
//! updates, and list pagination on top of a `TaskRepository`.

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{
    CreateTaskRequest, Task, TaskPriority, TaskQueryParams, TaskStatus, UpdateTaskRequest,
};
use crate::repository::{FilterSpec, TaskRepository};
use crate::response::PaginationMeta;

fn task_not_found() -> AppError {
    AppError::NotFound("task not found".into())
}

/// Parses a path segment into an `ObjectId`, rejecting anything that is not
/// a 24-character hex string before it reaches the store.
fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("invalid task ID".into()))
}

/// A due date in the past (or right now) is never acceptable on input.
fn ensure_future(due: chrono::DateTime<Utc>) -> Result<(), AppError> {
    if due <= Utc::now() {
        return Err(AppError::BadRequest("due date must be in the future".into()));
    }
    Ok(())
}

pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    /// Creates a task from a validated request. Status defaults to
    /// `pending` and priority to `medium` when omitted; a supplied due date
    /// must lie strictly in the future.
    pub async fn create(&self, req: &CreateTaskRequest) -> Result<Task, AppError> {
        if let Some(due) = req.due_date {
            ensure_future(due)?;
        }

        let status = req
            .status
            .as_deref()
            .and_then(TaskStatus::parse)
            .unwrap_or(TaskStatus::Pending);
        let priority = req
            .priority
            .as_deref()
            .and_then(TaskPriority::parse)
            .unwrap_or(TaskPriority::Medium);

        let task = Task::new(
            req.title.as_deref().unwrap_or_default(),
            req.description.as_deref().unwrap_or_default(),
            status,
            priority,
            req.due_date,
        );
        self.tasks.create(task).await
    }

    pub async fn get(&self, id: &str) -> Result<Task, AppError> {
        let id = parse_id(id)?;
        self.tasks.find_by_id(id).await?.ok_or_else(task_not_found)
    }

    /// Lists tasks matching the query parameters along with pagination
    /// metadata derived from the total match count.
    pub async fn list(
        &self,
        params: &TaskQueryParams,
    ) -> Result<(Vec<Task>, PaginationMeta), AppError> {
        let spec = FilterSpec::from_params(params);
        let (tasks, total) = self.tasks.find(&spec).await?;

        let meta = PaginationMeta {
            total,
            page: (spec.skip as i64 / spec.limit).saturating_add(1),
            limit: spec.limit,
            total_pages: (total as i64 + spec.limit - 1) / spec.limit,
        };
        Ok((tasks, meta))
    }

    /// Applies a partial update. Omitted fields, and fields sent as an
    /// empty string, keep their stored value. The due date is re-checked
    /// against the clock only when it actually changes, so a task whose
    /// stored due date has already passed can still be edited.
    pub async fn update(&self, id: &str, req: &UpdateTaskRequest) -> Result<Task, AppError> {
        let id = parse_id(id)?;
        let mut task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(task_not_found)?;

        if let Some(title) = req.title.as_deref().filter(|t| !t.is_empty()) {
            task.title = title.to_string();
        }
        if let Some(description) = req.description.as_deref().filter(|d| !d.is_empty()) {
            task.description = description.to_string();
        }
        if let Some(status) = req.status.as_deref().and_then(TaskStatus::parse) {
            task.status = status;
        }
        if let Some(priority) = req.priority.as_deref().and_then(TaskPriority::parse) {
            task.priority = priority;
        }
        if let Some(due) = req.due_date {
            if task.due_date != Some(due) {
                ensure_future(due)?;
                task.due_date = Some(due);
            }
        }
        task.updated_at = Utc::now();

        if !self.tasks.update(&task).await? {
            return Err(task_not_found());
        }
        Ok(task)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = parse_id(id)?;
        if !self.tasks.delete(id).await? {
            return Err(task_not_found());
        }
        Ok(())
    }
}

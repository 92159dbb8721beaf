//! In-memory adapters for the repository ports.
//!
//! These back the integration suite and local development without a running
//! MongoDB, while honoring the same contract as the Mongo adapters,
//! including the unique-email conflict and the "absent is `Ok(None)`"
//! convention.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::cmp::Ordering;
use std::sync::Mutex;

use crate::error::AppError;
use crate::models::{Task, User};
use crate::repository::{FilterSpec, TaskRepository, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.lock().expect("poisoned lock");
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(AppError::Conflict("email already exists".into()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().expect("poisoned lock");
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        let users = self.users.lock().expect("poisoned lock");
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn update(&self, user: &User) -> Result<bool, AppError> {
        let mut users = self.users.lock().expect("poisoned lock");
        match users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_by(sort_by: &str, a: &Task, b: &Task) -> Ordering {
    match sort_by {
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        // None sorts first, matching Mongo's missing-field ordering.
        "due_date" => a.due_date.cmp(&b.due_date),
        "priority" => a.priority.rank().cmp(&b.priority.rank()),
        "title" => a.title.cmp(&b.title),
        _ => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.lock().expect("poisoned lock");
        tasks.push(task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.lock().expect("poisoned lock");
        Ok(tasks.iter().find(|task| task.id == id).cloned())
    }

    async fn find(&self, spec: &FilterSpec) -> Result<(Vec<Task>, u64), AppError> {
        let tasks = self.tasks.lock().expect("poisoned lock");
        let mut matching: Vec<Task> = tasks
            .iter()
            .filter(|task| spec.matches(task))
            .cloned()
            .collect();
        let total = matching.len() as u64;

        matching.sort_by(|a, b| {
            let ordering = compare_by(&spec.sort_by, a, b);
            if spec.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        let page = matching
            .into_iter()
            .skip(spec.skip as usize)
            .take(spec.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(&self, task: &Task) -> Result<bool, AppError> {
        let mut tasks = self.tasks.lock().expect("poisoned lock");
        match tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let mut tasks = self.tasks.lock().expect("poisoned lock");
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        Ok(tasks.len() < before)
    }
}

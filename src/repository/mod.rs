//! Persistence ports and adapters.
//!
//! Services depend only on the [`UserRepository`] and [`TaskRepository`]
//! traits; the Mongo adapter backs production and the in-memory adapter
//! backs the integration suite and local development.

pub mod filter;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::AppError;
use crate::models::{Task, User};

pub use filter::FilterSpec;
pub use memory::{InMemoryTaskRepository, InMemoryUserRepository};
pub use mongo::{MongoTaskRepository, MongoUserRepository};

/// Port for user persistence.
///
/// "No matching document" is `Ok(None)`, never an error; turning absence
/// into `NotFound` is the service layer's job.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user. A duplicate email surfaces as
    /// `AppError::Conflict`, enforced by the store's unique constraint.
    async fn create(&self, user: User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError>;
    /// Replaces the stored document. Returns `false` when no document
    /// matched the user's id.
    async fn update(&self, user: &User) -> Result<bool, AppError>;
}

/// Port for task persistence.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: Task) -> Result<Task, AppError>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Task>, AppError>;
    /// Returns the matching page plus the total match count (pre-pagination).
    async fn find(&self, spec: &FilterSpec) -> Result<(Vec<Task>, u64), AppError>;
    /// Replaces the stored document. Returns `false` when no document
    /// matched the task's id.
    async fn update(&self, task: &Task) -> Result<bool, AppError>;
    /// Returns `false` when no document matched `id`.
    async fn delete(&self, id: ObjectId) -> Result<bool, AppError>;
}

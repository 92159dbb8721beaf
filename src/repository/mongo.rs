//! MongoDB adapters for the repository ports, plus connection and index
//! bootstrap.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, FindOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use crate::config::MongoConfig;
use crate::error::AppError;
use crate::models::{Task, User};
use crate::repository::{FilterSpec, TaskRepository, UserRepository};

const USERS_COLLECTION: &str = "users";
const TASKS_COLLECTION: &str = "tasks";

/// Connects to MongoDB and verifies the connection with a ping.
pub async fn connect(config: &MongoConfig) -> Result<Database, AppError> {
    let mut options = ClientOptions::parse(&config.uri).await?;
    options.max_pool_size = Some(100);
    options.min_pool_size = Some(10);
    options.max_idle_time = Some(Duration::from_secs(30));
    options.connect_timeout = Some(config.timeout);
    options.server_selection_timeout = Some(config.timeout);

    let client = Client::with_options(options)?;
    let database = client.database(&config.database);
    database.run_command(doc! {"ping": 1}, None).await?;
    Ok(database)
}

/// Creates the indexes the queries rely on: the unique constraint on
/// `users.email` and the task filter/sort indexes.
pub async fn ensure_indexes(database: &Database) -> Result<(), AppError> {
    let users: Collection<User> = database.collection(USERS_COLLECTION);
    users
        .create_index(
            IndexModel::builder()
                .keys(doc! {"email": 1})
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            None,
        )
        .await?;

    let tasks: Collection<Task> = database.collection(TASKS_COLLECTION);
    for keys in [
        doc! {"status": 1},
        doc! {"priority": 1},
        doc! {"due_date": 1},
        doc! {"created_at": -1},
    ] {
        tasks
            .create_index(IndexModel::builder().keys(keys).build(), None)
            .await?;
    }

    Ok(())
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        &*error.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

/// Compiles a [`FilterSpec`]'s predicates into a Mongo query document.
/// The search term is regex-escaped so it matches as a literal substring.
pub fn filter_document(spec: &FilterSpec) -> Document {
    let mut query = Document::new();

    if let Some(status) = spec.status {
        query.insert("status", status.as_str());
    }
    if let Some(rank) = spec.priority {
        query.insert("priority", rank);
    }
    if let Some(search) = &spec.search {
        let pattern = regex::escape(search);
        query.insert(
            "$or",
            vec![
                doc! {"title": {"$regex": &pattern, "$options": "i"}},
                doc! {"description": {"$regex": &pattern, "$options": "i"}},
            ],
        );
    }

    let mut due = Document::new();
    if let Some(from) = spec.due_date_from {
        due.insert("$gte", BsonDateTime::from_chrono(from));
    }
    if let Some(to) = spec.due_date_to {
        due.insert("$lte", BsonDateTime::from_chrono(to));
    }
    if !due.is_empty() {
        query.insert("due_date", due);
    }

    query
}

fn sort_document(spec: &FilterSpec) -> Document {
    let direction = if spec.descending { -1 } else { 1 };
    doc! { spec.sort_by.as_str(): direction }
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> Result<User, AppError> {
        match self.collection.insert_one(&user, None).await {
            Ok(_) => Ok(user),
            // The unique email index is the race-safety net for concurrent
            // registrations; surface it as a domain conflict.
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::Conflict("email already exists".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! {"email": email}, None).await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! {"_id": id}, None).await?)
    }

    async fn update(&self, user: &User) -> Result<bool, AppError> {
        let result = self
            .collection
            .replace_one(doc! {"_id": user.id}, user, None)
            .await?;
        Ok(result.matched_count > 0)
    }
}

pub struct MongoTaskRepository {
    collection: Collection<Task>,
}

impl MongoTaskRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(TASKS_COLLECTION),
        }
    }
}

#[async_trait]
impl TaskRepository for MongoTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, AppError> {
        self.collection.insert_one(&task, None).await?;
        Ok(task)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Task>, AppError> {
        Ok(self.collection.find_one(doc! {"_id": id}, None).await?)
    }

    async fn find(&self, spec: &FilterSpec) -> Result<(Vec<Task>, u64), AppError> {
        let query = filter_document(spec);
        let total = self.collection.count_documents(query.clone(), None).await?;

        let options = FindOptions::builder()
            .sort(sort_document(spec))
            .skip(spec.skip)
            .limit(spec.limit)
            .build();
        let tasks: Vec<Task> = self
            .collection
            .find(query, options)
            .await?
            .try_collect()
            .await?;

        Ok((tasks, total))
    }

    async fn update(&self, task: &Task) -> Result<bool, AppError> {
        let result = self
            .collection
            .replace_one(doc! {"_id": task.id}, task, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection.delete_one(doc! {"_id": id}, None).await?;
        Ok(result.deleted_count > 0)
    }
}

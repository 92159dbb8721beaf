pub mod task;
pub mod user;

pub use task::{
    CreateTaskRequest, Task, TaskListResponse, TaskPriority, TaskQueryParams, TaskResponse,
    TaskStatus, UpdateTaskRequest,
};
pub use user::{User, UserResponse};

/// Serde adapter storing `Option<chrono::DateTime<Utc>>` as a native BSON
/// datetime, so Mongo range queries and sorts compare dates numerically.
pub(crate) mod bson_datetime_option {
    use chrono::{DateTime, Utc};
    use mongodb::bson::DateTime as BsonDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(BsonDateTime::from_chrono).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<BsonDateTime>::deserialize(deserializer)?.map(|value| value.to_chrono()))
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A registered account as stored in the `users` collection.
///
/// The `password` field holds the bcrypt hash, never the plaintext; clients
/// only ever see [`UserResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub password: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, password_hash: &str) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            email: email.to_string(),
            password: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Client-facing view of a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            email: user.email.clone(),
            created_at: user.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            updated_at: user.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

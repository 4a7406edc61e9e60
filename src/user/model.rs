use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STATUS: &str = "I am new!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub name: String,
    pub password: String,
    pub status: String,
    #[serde(default)]
    pub posts: Vec<ObjectId>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, name: String, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            email,
            name,
            password: hashed_password,
            status: DEFAULT_STATUS.to_string(),
            posts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, InputObject)]
#[graphql(name = "userInfo")]
pub struct CreateUserInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct AuthData {
    pub token: String,
    pub user_id: String,
}

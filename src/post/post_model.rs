use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(title: String, content: String, image_url: String, creator: ObjectId) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            title,
            content,
            image_url,
            creator,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, InputObject)]
#[graphql(name = "PostInfo")]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub image_url: String,
}

/// Fields written by `updatePost`; `image_url` stays untouched when `None`.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(SimpleObject)]
pub struct PostData {
    pub posts: Vec<Post>,
    pub total_posts: i32,
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{Bson, to_document};

    use super::*;

    #[test]
    fn timestamps_are_stored_as_bson_dates() {
        let post = Post::new(
            "First post".into(),
            "Some content".into(),
            "images/a.png".into(),
            ObjectId::new(),
        );
        let doc = to_document(&post).unwrap();

        assert!(matches!(doc.get("created_at"), Some(Bson::DateTime(_))));
        assert!(matches!(doc.get("updated_at"), Some(Bson::DateTime(_))));

        let restored: Post = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(
            restored.created_at.timestamp_millis(),
            post.created_at.timestamp_millis()
        );
    }
}

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use crate::post::post_model::{Post, PostChanges};
use crate::utils::error::CustomError;

/// Persistence operations on the `posts` collection.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn count(&self) -> Result<u64, CustomError>;

    /// Newest first.
    async fn find_page(&self, skip: u64, limit: i64) -> Result<Vec<Post>, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError>;

    /// Returned in the order of `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Post>, CustomError>;

    async fn insert(&self, post: Post) -> Result<Post, CustomError>;

    async fn update(
        &self,
        id: &ObjectId,
        changes: PostChanges,
    ) -> Result<Option<Post>, CustomError>;

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct PostService {
    collection: Collection<Post>,
}

impl PostService {
    pub fn new(client: &Client, database: &str) -> Self {
        let collection = client.database(database).collection::<Post>("posts");
        PostService { collection }
    }
}

#[async_trait]
impl PostRepository for PostService {
    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn find_page(&self, skip: u64, limit: i64) -> Result<Vec<Post>, CustomError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Post>, CustomError> {
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        let mut found: Vec<Post> = cursor.try_collect().await?;

        let mut ordered = Vec::with_capacity(found.len());
        for id in ids {
            if let Some(pos) = found.iter().position(|p| &p.id == id) {
                ordered.push(found.swap_remove(pos));
            }
        }
        Ok(ordered)
    }

    async fn insert(&self, post: Post) -> Result<Post, CustomError> {
        self.collection.insert_one(&post).await?;
        Ok(post)
    }

    async fn update(
        &self,
        id: &ObjectId,
        changes: PostChanges,
    ) -> Result<Option<Post>, CustomError> {
        let mut set = Document::new();
        set.insert("title", changes.title);
        set.insert("content", changes.content);
        if let Some(image_url) = changes.image_url {
            set.insert("image_url", image_url);
        }
        set.insert("updated_at", DateTime::now());

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

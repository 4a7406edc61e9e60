//! In-memory repositories and a schema harness for resolver tests.

use std::sync::{Arc, Mutex};

use async_graphql::{Request, Response, Variables};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use tempfile::TempDir;

use crate::middleware::auth::AuthContext;
use crate::post::post_model::{Post, PostChanges};
use crate::post::post_service::PostRepository;
use crate::schema::{AppSchema, Services, build_schema};
use crate::user::model::User;
use crate::user::service::{UserRepository, email_exists};
use crate::utils::credentials::CredentialService;
use crate::utils::error::CustomError;
use crate::utils::uploads::ImageStore;

#[derive(Default)]
pub struct MemoryUsers {
    pub users: Mutex<Vec<User>>,
    pub inserts: Mutex<usize>,
    pub fail_add_post: Mutex<bool>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| &u.id == id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, CustomError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(email_exists());
        }
        users.push(user.clone());
        *self.inserts.lock().unwrap() += 1;
        Ok(user)
    }

    async fn add_post(&self, user_id: &ObjectId, post_id: &ObjectId) -> Result<(), CustomError> {
        if *self.fail_add_post.lock().unwrap() {
            return Err(CustomError::InternalServerError(
                "Database operation failed".to_string(),
            ));
        }
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| &u.id == user_id)
            .ok_or_else(|| CustomError::NotFoundError("No user found!".to_string()))?;
        user.posts.push(*post_id);
        Ok(())
    }

    async fn remove_post(
        &self,
        user_id: &ObjectId,
        post_id: &ObjectId,
    ) -> Result<(), CustomError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| &u.id == user_id) {
            user.posts.retain(|p| p != post_id);
        }
        Ok(())
    }

    async fn update_status(
        &self,
        user_id: &ObjectId,
        status: &str,
    ) -> Result<Option<User>, CustomError> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| &u.id == user_id).map(|user| {
            user.status = status.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[derive(Default)]
pub struct MemoryPosts {
    pub posts: Mutex<Vec<Post>>,
}

#[async_trait]
impl PostRepository for MemoryPosts {
    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.posts.lock().unwrap().len() as u64)
    }

    async fn find_page(&self, skip: u64, limit: i64) -> Result<Vec<Post>, CustomError> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| &p.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Post>, CustomError> {
        let posts = self.posts.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| posts.iter().find(|p| &p.id == id).cloned())
            .collect())
    }

    async fn insert(&self, post: Post) -> Result<Post, CustomError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update(
        &self,
        id: &ObjectId,
        changes: PostChanges,
    ) -> Result<Option<Post>, CustomError> {
        let mut posts = self.posts.lock().unwrap();
        Ok(posts.iter_mut().find(|p| &p.id == id).map(|post| {
            post.title = changes.title;
            post.content = changes.content;
            if let Some(image_url) = changes.image_url {
                post.image_url = image_url;
            }
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| &p.id != id);
        Ok(posts.len() < before)
    }
}

pub struct TestApp {
    pub schema: AppSchema,
    pub users: Arc<MemoryUsers>,
    pub posts: Arc<MemoryPosts>,
    pub credentials: CredentialService,
    pub root: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUsers::default());
        let posts = Arc::new(MemoryPosts::default());
        let credentials = CredentialService::new("test-secret", Duration::hours(1), 4);
        let root = tempfile::tempdir().expect("temp dir");

        let schema = build_schema(Services {
            users: users.clone(),
            posts: posts.clone(),
            credentials: credentials.clone(),
            images: ImageStore::new(root.path(), "images"),
        });

        Self {
            schema,
            users,
            posts,
            credentials,
            root,
        }
    }

    pub async fn execute(&self, query: &str, variables: Value, auth: AuthContext) -> Response {
        let request = Request::new(query)
            .variables(Variables::from_json(variables))
            .data(auth);
        self.schema.execute(request).await
    }

    /// Registers a user through the API and returns its id.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .execute(
                r#"mutation($input: userInfo) { createUser(userInput: $input) { _id } }"#,
                serde_json::json!({
                    "input": { "email": email, "name": "Max", "password": password }
                }),
                AuthContext::anonymous(),
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        data(&response)["createUser"]["_id"]
            .as_str()
            .expect("user id")
            .to_string()
    }

    pub async fn create_post(&self, user_id: &str, title: &str, image_url: &str) -> String {
        let response = self
            .execute(
                r#"mutation($input: PostInfo) { createPost(postInput: $input) { _id } }"#,
                serde_json::json!({
                    "input": { "title": title, "content": "Some content", "imageUrl": image_url }
                }),
                AuthContext::authenticated(user_id),
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        data(&response)["createPost"]["_id"]
            .as_str()
            .expect("post id")
            .to_string()
    }
}

pub fn data(response: &Response) -> Value {
    serde_json::to_value(&response.data).expect("response data")
}

/// `extensions.code` of the first error.
pub fn error_code(response: &Response) -> i64 {
    let error = response.errors.first().expect("an error");
    let ext = serde_json::to_value(error.extensions.as_ref().expect("extensions")).unwrap();
    ext["code"].as_i64().expect("numeric code")
}

use async_trait::async_trait;
use mongodb::bson::{DateTime, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use crate::user::model::User;
use crate::utils::error::CustomError;

/// Persistence operations on the `users` collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError>;

    /// Fails with [`email_exists`] when the email is already taken.
    async fn insert(&self, user: User) -> Result<User, CustomError>;

    async fn add_post(&self, user_id: &ObjectId, post_id: &ObjectId) -> Result<(), CustomError>;

    async fn remove_post(&self, user_id: &ObjectId, post_id: &ObjectId)
    -> Result<(), CustomError>;

    async fn update_status(
        &self,
        user_id: &ObjectId,
        status: &str,
    ) -> Result<Option<User>, CustomError>;
}

/// Reported without a client error code, so it surfaces as a 500.
pub fn email_exists() -> CustomError {
    CustomError::InternalServerError("Email exists, try logging in!".to_string())
}

pub struct UserService {
    collection: Collection<User>,
}

impl UserService {
    pub fn new(client: &Client, database: &str) -> Self {
        let collection = client.database(database).collection::<User>("users");
        UserService { collection }
    }
}

#[async_trait]
impl UserRepository for UserService {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn insert(&self, user: User) -> Result<User, CustomError> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(email_exists()),
            Err(e) => Err(e.into()),
        }
    }

    async fn add_post(&self, user_id: &ObjectId, post_id: &ObjectId) -> Result<(), CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$push": { "posts": post_id },
                    "$set": { "updated_at": DateTime::now() }
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(CustomError::NotFoundError("No user found!".to_string()));
        }
        Ok(())
    }

    async fn remove_post(
        &self,
        user_id: &ObjectId,
        post_id: &ObjectId,
    ) -> Result<(), CustomError> {
        self.collection
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$pull": { "posts": post_id },
                    "$set": { "updated_at": DateTime::now() }
                },
            )
            .await?;
        Ok(())
    }

    async fn update_status(
        &self,
        user_id: &ObjectId,
        status: &str,
    ) -> Result<Option<User>, CustomError> {
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": user_id },
                doc! { "$set": { "status": status, "updated_at": DateTime::now() } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

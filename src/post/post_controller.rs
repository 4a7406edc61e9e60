use log::{error, info};
use mongodb::bson::oid::ObjectId;

use crate::middleware::auth::AuthContext;
use crate::post::post_model::{Post, PostChanges, PostData, PostInput};
use crate::post::post_service::PostRepository;
use crate::user::service::UserRepository;
use crate::utils::error::{CustomError, FieldError};
use crate::utils::uploads::ImageStore;
use crate::utils::validation;

pub const POSTS_PER_PAGE: u32 = 2;

/// Sentinel some clients send when the image was left unchanged.
const UNCHANGED_IMAGE: &str = "undefined";

fn post_not_found() -> CustomError {
    CustomError::NotFoundError("No post found!".to_string())
}

fn parse_post_id(id: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(id).map_err(|_| post_not_found())
}

fn require_input(input: Option<PostInput>) -> Result<PostInput, CustomError> {
    input.ok_or_else(|| {
        CustomError::ValidationError(vec![FieldError::new("Post input is required.")])
    })
}

async fn find_owned_post(
    posts: &dyn PostRepository,
    post_id: &ObjectId,
    user_id: &ObjectId,
) -> Result<Post, CustomError> {
    let post = posts.find_by_id(post_id).await?.ok_or_else(post_not_found)?;
    if &post.creator != user_id {
        return Err(CustomError::not_authorized());
    }
    Ok(post)
}

pub async fn list_posts(
    posts: &dyn PostRepository,
    auth: &AuthContext,
    page: Option<i32>,
) -> Result<PostData, CustomError> {
    auth.require_user()?;

    let page = page.unwrap_or(1).max(1) as u64;
    let total_posts = posts.count().await?;
    let skip = (page - 1) * u64::from(POSTS_PER_PAGE);
    let items = posts.find_page(skip, i64::from(POSTS_PER_PAGE)).await?;

    Ok(PostData {
        posts: items,
        total_posts: i32::try_from(total_posts).unwrap_or(i32::MAX),
    })
}

pub async fn get_post(
    posts: &dyn PostRepository,
    auth: &AuthContext,
    id: &str,
) -> Result<Post, CustomError> {
    auth.require_user()?;

    let post_id = parse_post_id(id)?;
    posts.find_by_id(&post_id).await?.ok_or_else(post_not_found)
}

pub async fn create_post(
    users: &dyn UserRepository,
    posts: &dyn PostRepository,
    auth: &AuthContext,
    input: Option<PostInput>,
) -> Result<Post, CustomError> {
    let user_id = auth.require_user()?;
    let input = require_input(input)?;
    validation::validate_post(&input.title, &input.content)?;

    let user = users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| CustomError::UnauthenticatedError("Invalid user.".to_string()))?;

    let post = posts
        .insert(Post::new(input.title, input.content, input.image_url, user.id))
        .await?;

    if let Err(e) = users.add_post(&user.id, &post.id).await {
        error!("Linking post {} to user {} failed, rolling back", post.id, user.id);
        if let Err(rollback) = posts.delete(&post.id).await {
            error!("Rollback of post {} failed: {}", post.id, rollback);
        }
        return Err(e);
    }

    info!("User {} created post {}", user.id, post.id);
    Ok(post)
}

pub async fn update_post(
    posts: &dyn PostRepository,
    auth: &AuthContext,
    id: &str,
    input: Option<PostInput>,
) -> Result<Post, CustomError> {
    let user_id = auth.require_user()?;
    let post_id = parse_post_id(id)?;
    find_owned_post(posts, &post_id, &user_id).await?;

    let input = require_input(input)?;
    validation::validate_post(&input.title, &input.content)?;

    let image_url = Some(input.image_url).filter(|url| url != UNCHANGED_IMAGE);
    posts
        .update(
            &post_id,
            PostChanges {
                title: input.title,
                content: input.content,
                image_url,
            },
        )
        .await?
        .ok_or_else(post_not_found)
}

pub async fn delete_post(
    users: &dyn UserRepository,
    posts: &dyn PostRepository,
    images: &ImageStore,
    auth: &AuthContext,
    id: &str,
) -> Result<bool, CustomError> {
    let user_id = auth.require_user()?;
    let post_id = parse_post_id(id)?;
    let post = find_owned_post(posts, &post_id, &user_id).await?;

    users.remove_post(&user_id, &post_id).await?;

    match posts.delete(&post_id).await {
        Ok(true) => {}
        Ok(false) => return Err(post_not_found()),
        Err(e) => {
            error!("Deleting post {} failed, restoring it on user {}", post_id, user_id);
            if let Err(restore) = users.add_post(&user_id, &post_id).await {
                error!("Restoring post {} on user {} failed: {}", post_id, user_id, restore);
            }
            return Err(e);
        }
    }

    images.clear_image(&user_id.to_hex(), &post.image_url).await;

    info!("User {} deleted post {}", user_id, post_id);
    Ok(true)
}

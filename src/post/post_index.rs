use async_graphql::{Context, ErrorExtensions, ID, Object, Result as GraphQLResult};
use chrono::SecondsFormat;

use super::post_controller;
use super::post_model::{Post, PostData, PostInput};
use crate::schema::{auth_context, services};
use crate::user::model::User;
use crate::utils::error::CustomError;

#[Object(name = "Post")]
impl Post {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.id.to_hex())
    }

    async fn title(&self) -> &str {
        &self.title
    }

    async fn content(&self) -> &str {
        &self.content
    }

    async fn image_url(&self) -> &str {
        &self.image_url
    }

    async fn creator(&self, ctx: &Context<'_>) -> GraphQLResult<User> {
        services(ctx)?
            .users
            .find_by_id(&self.creator)
            .await
            .and_then(|user| {
                user.ok_or_else(|| CustomError::NotFoundError("No user found!".to_string()))
            })
            .map_err(|e| e.extend())
    }

    async fn created_at(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    async fn updated_at(&self) -> String {
        self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    async fn posts(&self, ctx: &Context<'_>, page: Option<i32>) -> GraphQLResult<PostData> {
        post_controller::list_posts(services(ctx)?.posts.as_ref(), &auth_context(ctx), page)
            .await
            .map_err(|e| e.extend())
    }

    async fn post(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Post> {
        post_controller::get_post(services(ctx)?.posts.as_ref(), &auth_context(ctx), &id)
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        post_input: Option<PostInput>,
    ) -> GraphQLResult<Post> {
        let services = services(ctx)?;
        post_controller::create_post(
            services.users.as_ref(),
            services.posts.as_ref(),
            &auth_context(ctx),
            post_input,
        )
        .await
        .map_err(|e| e.extend())
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        post_input: Option<PostInput>,
    ) -> GraphQLResult<Post> {
        post_controller::update_post(
            services(ctx)?.posts.as_ref(),
            &auth_context(ctx),
            &id,
            post_input,
        )
        .await
        .map_err(|e| e.extend())
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<bool>> {
        let services = services(ctx)?;
        post_controller::delete_post(
            services.users.as_ref(),
            services.posts.as_ref(),
            &services.images,
            &auth_context(ctx),
            &id,
        )
        .await
        .map(Some)
        .map_err(|e| e.extend())
    }
}

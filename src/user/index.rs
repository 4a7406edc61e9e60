use async_graphql::{Context, ErrorExtensions, ID, Object, Result as GraphQLResult};

use super::controller;
use super::model::{AuthData, CreateUserInput, User};
use crate::post::post_model::Post;
use crate::schema::{auth_context, services};

#[Object(name = "User")]
impl User {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.id.to_hex())
    }

    async fn name(&self) -> &str {
        &self.name
    }

    async fn email(&self) -> &str {
        &self.email
    }

    /// The stored bcrypt hash, never the plain password.
    async fn password(&self) -> &str {
        &self.password
    }

    async fn status(&self) -> &str {
        &self.status
    }

    async fn posts(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        services(ctx)?
            .posts
            .find_by_ids(&self.posts)
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> GraphQLResult<AuthData> {
        let services = services(ctx)?;
        controller::login(
            services.users.as_ref(),
            &services.credentials,
            &email,
            &password,
        )
        .await
        .map_err(|e| e.extend())
    }

    async fn user(&self, ctx: &Context<'_>) -> GraphQLResult<User> {
        controller::current_user(services(ctx)?.users.as_ref(), &auth_context(ctx))
            .await
            .map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        user_input: Option<CreateUserInput>,
    ) -> GraphQLResult<User> {
        let services = services(ctx)?;
        controller::create_user(services.users.as_ref(), &services.credentials, user_input)
            .await
            .map_err(|e| e.extend())
    }

    async fn update_status(&self, ctx: &Context<'_>, status: String) -> GraphQLResult<User> {
        controller::update_status(services(ctx)?.users.as_ref(), &auth_context(ctx), &status)
            .await
            .map_err(|e| e.extend())
    }
}

//! GraphQL schema assembly and per-request context access.

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, MergedObject, Schema};

use crate::middleware::auth::AuthContext;
use crate::post::post_index::{PostMutation, PostQuery};
use crate::post::post_service::PostRepository;
use crate::user::index::{UserMutation, UserQuery};
use crate::user::service::UserRepository;
use crate::utils::credentials::CredentialService;
use crate::utils::uploads::ImageStore;

#[derive(MergedObject, Default)]
#[graphql(name = "rootQuery")]
pub struct QueryRoot(UserQuery, PostQuery);

#[derive(MergedObject, Default)]
#[graphql(name = "rootMutation")]
pub struct MutationRoot(UserMutation, PostMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Collaborators shared by every resolver.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub credentials: CredentialService,
    pub images: ImageStore,
}

pub fn build_schema(services: Services) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(services)
        .finish()
}

pub fn services<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Services> {
    ctx.data::<Services>()
}

/// Requests executed without an attached context are anonymous.
pub fn auth_context(ctx: &Context<'_>) -> AuthContext {
    ctx.data_opt::<AuthContext>().cloned().unwrap_or_default()
}

use actix_web::{HttpResponse, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::middleware::auth::AuthContext;
use crate::schema::AppSchema;
use crate::utils::credentials::CredentialService;

pub async fn graphql_handler(
    schema: web::Data<AppSchema>,
    credentials: web::Data<CredentialService>,
    bearer: Option<BearerAuth>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let auth = AuthContext::from_bearer(bearer.as_ref(), &credentials);
    schema.execute(req.into_inner().data(auth)).await.into()
}

pub async fn graphiql_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

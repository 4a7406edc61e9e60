use super::graphql::{graphiql_handler, graphql_handler};
use crate::uploader::index::upload_routes;
use actix_web::web;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/graphql")
            .route(web::post().to(graphql_handler))
            .route(web::get().to(graphiql_handler)),
    );
    cfg.configure(upload_routes);
}

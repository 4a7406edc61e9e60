use super::controller::upload_post_image;
use crate::middleware::auth::verify_token;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn upload_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/post-image")
            .wrap(HttpAuthentication::bearer(verify_token))
            .route(web::put().to(upload_post_image)),
    );
}

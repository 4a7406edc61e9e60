use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use env_logger::Env;
use log::info;
use serde_json::json;

mod config;
mod database;
mod middleware;
mod post;
mod router;
mod schema;
mod uploader;
mod user;
mod utils;

#[cfg(test)]
mod test_support;

use config::AppConfig;
use middleware::error_handler::handle_error;
use middleware::not_found::not_found;
use post::post_service::PostService;
use router::index::routes;
use schema::{Services, build_schema};
use user::service::UserService;
use utils::credentials::CredentialService;
use utils::uploads::ImageStore;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the blog GraphQL API",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let mongo_client = database::connect_to_mongo(&config.mongodb_uri, &config.database_name)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let credentials = CredentialService::new(
        config.jwt_secret.clone(),
        config.token_ttl(),
        config.bcrypt_cost,
    );
    let images = ImageStore::new(".", config.images_dir.clone());

    let schema = build_schema(Services {
        users: Arc::new(UserService::new(&mongo_client, &config.database_name)),
        posts: Arc::new(PostService::new(&mongo_client, &config.database_name)),
        credentials: credentials.clone(),
        images: images.clone(),
    });

    let credentials = web::Data::new(credentials);
    let images = web::Data::new(images);

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["OPTIONS", "GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .max_age(3600);

        App::new()
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::NOT_FOUND, not_found)
                    .default_handler(handle_error),
            )
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(schema.clone()))
            .app_data(credentials.clone())
            .app_data(images.clone())
            .configure(routes)
            .service(default)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}

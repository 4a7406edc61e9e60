use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::middleware::error_handler::error_envelope;

/// A single field-level validation message, rendered as `{ "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Invalid input.")]
    ValidationError(Vec<FieldError>),

    #[error("{0}")]
    UnauthenticatedError(String),

    #[error("{0}")]
    UnauthorizedError(String),

    #[error("{0}")]
    NotFoundError(String),

    #[error("{0}")]
    BadRequestError(String),

    #[error("{0}")]
    InternalServerError(String),
}

impl CustomError {
    pub fn not_authenticated() -> Self {
        CustomError::UnauthenticatedError("Not authenticated!".to_string())
    }

    pub fn not_authorized() -> Self {
        CustomError::UnauthorizedError("Not authorized!".to_string())
    }

    fn error_type(&self) -> &'static str {
        match *self {
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
            CustomError::UnauthenticatedError(..) => "UNAUTHENTICATED_ERROR",
            CustomError::UnauthorizedError(..) => "UNAUTHORIZED_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::BadRequestError(..) => "BAD_REQUEST_ERROR",
            CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::ValidationError(..) => StatusCode::UNPROCESSABLE_ENTITY,
            CustomError::UnauthenticatedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::UnauthorizedError(..) => StatusCode::FORBIDDEN,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::BadRequestError(..) => StatusCode::BAD_REQUEST,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = error_envelope(self.status_code(), &self.to_string(), self.error_type());
        if let CustomError::ValidationError(errors) = self {
            body["data"] = json!(errors);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl ErrorExtensions for CustomError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", i32::from(self.status_code().as_u16()));
            if let CustomError::ValidationError(errors) = self {
                if let Ok(data) = async_graphql::to_value(errors) {
                    ext.set("data", data);
                }
            }
        })
    }
}

impl From<mongodb::error::Error> for CustomError {
    fn from(err: mongodb::error::Error) -> Self {
        log::error!("MongoDB operation failed: {}", err);
        CustomError::InternalServerError("Database operation failed".to_string())
    }
}

use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpResponse, Result, dev::ServiceResponse};
use serde_json::{Value, json};

/// JSON body shared by every non-GraphQL error response.
pub fn error_envelope(status: StatusCode, message: &str, error: &str) -> Value {
    json!({
        "success": false,
        "message": message,
        "httpStatusCode": status.as_u16(),
        "error": error,
        "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
    })
}

/// Rewrites plain-text framework errors (bad multipart, missing bearer header, ...)
/// into the JSON envelope. Responses that already carry JSON are left alone.
pub fn handle_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .response()
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = res.status();
    let message = res
        .response()
        .error()
        .map(|e| e.to_string())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
    let error = status
        .canonical_reason()
        .unwrap_or("Unknown")
        .to_uppercase()
        .replace(' ', "_");

    let new_response =
        HttpResponse::build(status).json(error_envelope(status, &message, &error));
    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, new_response.map_into_right_body());

    Ok(ErrorHandlerResponse::Response(res))
}

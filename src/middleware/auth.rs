use actix_web::{Error, HttpMessage, dev::ServiceRequest, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use mongodb::bson::oid::ObjectId;

use crate::utils::credentials::{Claims, CredentialService};
use crate::utils::error::CustomError;

/// Authentication state of a single request, attached to every GraphQL execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub is_auth: bool,
    pub user_id: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            is_auth: true,
            user_id: Some(user_id.into()),
        }
    }

    /// Decodes an optional bearer credential. Missing or invalid tokens leave the
    /// request unauthenticated instead of rejecting it.
    pub fn from_bearer(credentials: Option<&BearerAuth>, service: &CredentialService) -> Self {
        let Some(credentials) = credentials else {
            return Self::anonymous();
        };

        match service.decode_token(credentials.token()) {
            Ok(claims) => Self::authenticated(claims.user_id),
            Err(_) => {
                log::debug!("Ignoring invalid bearer token");
                Self::anonymous()
            }
        }
    }

    /// The authenticated user's id, or 401.
    pub fn require_user(&self) -> Result<ObjectId, CustomError> {
        match (&self.is_auth, &self.user_id) {
            (true, Some(id)) => {
                ObjectId::parse_str(id).map_err(|_| CustomError::not_authenticated())
            }
            _ => Err(CustomError::not_authenticated()),
        }
    }
}

/// Bearer validator for REST routes that must reject anonymous callers outright.
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(service) = req.app_data::<web::Data<CredentialService>>() else {
        return Err((
            CustomError::InternalServerError("Credential service not configured".to_string())
                .into(),
            req,
        ));
    };

    match service.decode_token(credentials.token()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        Err(_) => Err((CustomError::not_authenticated().into(), req)),
    }
}

/// Get user ID from request extensions (use after `verify_token`)
pub fn get_user_id_from_request(req: &actix_web::HttpRequest) -> Option<String> {
    req.extensions()
        .get::<Claims>()
        .map(|claims| claims.user_id.clone())
}

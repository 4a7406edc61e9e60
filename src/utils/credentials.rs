use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub exp: usize,
}

/// Password hashing and signed-token handling shared by resolvers and the auth middleware.
#[derive(Clone)]
pub struct CredentialService {
    secret: String,
    token_ttl: Duration,
    hash_cost: u32,
}

impl CredentialService {
    pub fn new(secret: impl Into<String>, token_ttl: Duration, hash_cost: u32) -> Self {
        Self {
            secret: secret.into(),
            token_ttl,
            hash_cost,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, CustomError> {
        bcrypt::hash(password, self.hash_cost).map_err(|e| {
            log::error!("Password hashing failed: {}", e);
            CustomError::InternalServerError("Unable to hash password".to_string())
        })
    }

    pub fn verify_password(&self, password: &str, hashed: &str) -> Result<bool, CustomError> {
        bcrypt::verify(password, hashed).map_err(|e| {
            log::error!("Password verification failed: {}", e);
            CustomError::InternalServerError("Unable to verify password".to_string())
        })
    }

    pub fn create_token(&self, user_id: &str, email: &str) -> Result<String, CustomError> {
        let expiration = Utc::now()
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| CustomError::InternalServerError("Invalid token lifetime".to_string()))?
            .timestamp() as usize;

        let claims = Claims {
            user_id: user_id.to_owned(),
            email: email.to_owned(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| CustomError::InternalServerError("Token generation failed".to_string()))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, CustomError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| CustomError::UnauthenticatedError("Invalid token".to_string()))
    }
}

use std::env;
use std::str::FromStr;

use chrono::Duration;

/// Runtime settings, read from the environment (and `.env` in development).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub images_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let jwt_secret = lookup("JWT_SECRET").ok_or("JWT_SECRET is required")?;
        if jwt_secret.trim().is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
            mongodb_uri: lookup("MONGODB_URI")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| "rust_blogdb".to_string()),
            jwt_secret,
            token_ttl_hours: parse_or(&lookup, "TOKEN_TTL_HOURS", 1)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            images_dir: lookup("IMAGES_DIR").unwrap_or_else(|| "images".to_string()),
        })
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::hours(self.token_ttl_hours)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, String> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

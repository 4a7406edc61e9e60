use std::sync::LazyLock;

use regex::Regex;

use crate::utils::error::{CustomError, FieldError};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_POST_FIELD_LENGTH: usize = 5;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Length is counted in characters after trimming surrounding whitespace.
pub fn has_min_length(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Accumulates field messages and turns them into a 422 if any were recorded.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(message));
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), CustomError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CustomError::ValidationError(std::mem::take(&mut self.errors)))
        }
    }
}

pub fn validate_registration(email: &str, password: &str) -> Result<(), CustomError> {
    Validator::new()
        .check(is_email(email), "E-Mail is invalid.")
        .check(
            has_min_length(password, MIN_PASSWORD_LENGTH),
            "Password too short!",
        )
        .finish()
}

pub fn validate_post(title: &str, content: &str) -> Result<(), CustomError> {
    Validator::new()
        .check(
            has_min_length(title, MIN_POST_FIELD_LENGTH),
            "Title is invalid.",
        )
        .check(
            has_min_length(content, MIN_POST_FIELD_LENGTH),
            "Content is invalid.",
        )
        .finish()
}

//! Request-body validation run before any handler logic.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Implemented by every request DTO.
pub trait Validate {
    /// Canonicalizes fields (trimming, case folding) before validation.
    fn normalize(&mut self) {}

    fn validate(&self) -> Result<(), AppError>;
}

/// Collects field violations and turns them into a single 400.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Records `<field> is required` when `value` is blank. Returns whether
    /// the value was present.
    pub fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(format!("{field} is required"));
            false
        } else {
            true
        }
    }

    pub fn password(&mut self, value: &str) {
        if value.chars().count() < MIN_PASSWORD_LENGTH {
            self.add(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
        }
    }

    pub fn email(&mut self, value: &str) {
        if self.require("email", value) && !is_valid_email(value) {
            self.add("Invalid email");
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0.join("; ")))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// True for an http(s) URL whose path ends in one of `extensions`.
pub fn is_url_with_extension(url: &str, extensions: &[&str]) -> bool {
    lazy_static! {
        static ref URL_RE: Regex =
            Regex::new(r"^(?i)https?://[^\s/?#]+(?P<path>/[^\s?#]*)(?:\?[^\s#]*)?(?:#\S*)?$")
                .unwrap();
    }
    let Some(path) = URL_RE.captures(url).and_then(|c| c.name("path")) else {
        return false;
    };
    let Some((_, ext)) = path.as_str().rsplit_once('.') else {
        return false;
    };
    extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// Parses a numeric path id; `what` names the resource in the error.
pub fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation(format!("Invalid {what} ID")))
}

/// `Json<T>` that also normalizes and validates the body, rejecting with a
/// JSON 400 instead of axum's plain-text rejection.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid JSON format: {}", e.body_text())))?;
        value.normalize();
        value.validate()?;
        Ok(ValidJson(value))
    }
}

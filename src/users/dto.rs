use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::User;
use crate::{
    error::AppError,
    validation::{Validate, Violations},
};

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Request body for `PUT /users/:id`. Unlike registration the password is
/// optional: absent or empty keeps the stored hash, anything else must pass the
/// usual length check.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
}

impl Validate for UpdateUserRequest {
    fn normalize(&mut self) {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        if self.password.as_deref() == Some("") {
            self.password = None;
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.require("username", &self.username);
        v.email(&self.email);
        if let Some(password) = &self.password {
            v.password(password);
        }
        v.finish()
    }
}

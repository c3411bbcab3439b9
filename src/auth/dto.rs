use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    validation::{Validate, Violations},
};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for RegisterRequest {
    fn normalize(&mut self) {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
    }

    fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.require("username", &self.username);
        v.email(&self.email);
        if v.require("password", &self.password) {
            v.password(&self.password);
        }
        v.finish()
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
    }

    fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.email(&self.email);
        v.require("password", &self.password);
        v.finish()
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
}

use anyhow::Context;
use serde::Deserialize;

/// Upper bound for `JWT_TTL_MINUTES` (one year).
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let config = Self {
            database_url,
            max_connections,
            jwt,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every token operation fail later.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.jwt.secret.trim().is_empty(), "JWT_SECRET must not be empty");
        anyhow::ensure!(self.jwt.ttl_minutes > 0, "JWT_TTL_MINUTES must be positive");
        anyhow::ensure!(
            self.jwt.ttl_minutes <= MAX_TTL_MINUTES,
            "JWT_TTL_MINUTES must be at most {MAX_TTL_MINUTES}"
        );
        Ok(())
    }
}

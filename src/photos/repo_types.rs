use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Photo record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub caption: Option<String>,
    pub photo_url: String,
    pub user_id: i64, // owner
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Photo joined with its owner's email, as returned by list/get.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PhotoView {
    pub id: i64,
    pub title: String,
    pub caption: Option<String>,
    pub photo_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(rename = "email")]
    pub owner_email: String,
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub title: String,
    pub caption: Option<String>,
    pub photo_url: String,
    pub user_id: i64,
}

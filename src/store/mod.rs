use thiserror::Error;

/// Failure reported by a repository implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique column (`"Email"` or `"Username"`) already holds the value.
    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                match db.constraint() {
                    Some("users_email_key") => return StoreError::Duplicate("Email"),
                    Some("users_username_key") => return StoreError::Duplicate("Username"),
                    _ => {}
                }
            }
        }
        StoreError::Backend(anyhow::Error::new(e))
    }
}

#[cfg(test)]
pub mod memory;

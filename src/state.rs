use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::photos::repo::{PgPhotoRepo, PhotoRepo};
use crate::users::repo::{PgUserRepo, UserRepo};
use std::sync::Arc;

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub photos: Arc<dyn PhotoRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let db = crate::db::connect(&config).await?;
        crate::db::migrate(&db).await?;

        let users = Arc::new(PgUserRepo::new(db.clone())) as Arc<dyn UserRepo>;
        let photos = Arc::new(PgPhotoRepo::new(db)) as Arc<dyn PhotoRepo>;
        Ok(Self::from_parts(&config, users, photos))
    }

    pub fn from_parts(
        config: &AppConfig,
        users: Arc<dyn UserRepo>,
        photos: Arc<dyn PhotoRepo>,
    ) -> Self {
        Self {
            keys: JwtKeys::from_config(&config.jwt),
            users,
            photos,
        }
    }

    /// State backed by one shared `MemoryStore`, for tests.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        use crate::store::memory::MemoryStore;

        let config = AppConfig {
            database_url: "memory://".into(),
            max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 5,
            },
        };
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(
            &config,
            store.clone() as Arc<dyn UserRepo>,
            store as Arc<dyn PhotoRepo>,
        )
    }
}

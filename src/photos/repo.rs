use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewPhoto, Photo, PhotoView};
use crate::store::StoreResult;

#[async_trait]
pub trait PhotoRepo: Send + Sync {
    /// The owner's photos, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<PhotoView>>;
    /// A single photo, only if `owner_id` owns it.
    async fn find_view(&self, id: i64, owner_id: i64) -> StoreResult<Option<PhotoView>>;
    /// Like `find_view` but returns the raw record for mutation.
    async fn find_owned(&self, id: i64, owner_id: i64) -> StoreResult<Option<Photo>>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Photo>>;
    async fn create(&self, new: NewPhoto) -> StoreResult<Photo>;
    /// Persists title, caption and url of an existing photo.
    async fn save(&self, photo: &Photo) -> StoreResult<Photo>;
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgPhotoRepo {
    db: PgPool,
}

impl PgPhotoRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PhotoRepo for PgPhotoRepo {
    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<PhotoView>> {
        let rows = sqlx::query_as::<_, PhotoView>(
            r#"
            SELECT p.id, p.title, p.caption, p.photo_url, p.created_at, p.updated_at,
                   u.email AS owner_email
              FROM photos p
              JOIN users u ON u.id = p.user_id
             WHERE p.user_id = $1
             ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_view(&self, id: i64, owner_id: i64) -> StoreResult<Option<PhotoView>> {
        let row = sqlx::query_as::<_, PhotoView>(
            r#"
            SELECT p.id, p.title, p.caption, p.photo_url, p.created_at, p.updated_at,
                   u.email AS owner_email
              FROM photos p
              JOIN users u ON u.id = p.user_id
             WHERE p.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> StoreResult<Option<Photo>> {
        let row = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, title, caption, photo_url, user_id, created_at, updated_at
              FROM photos
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Photo>> {
        let row = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, title, caption, photo_url, user_id, created_at, updated_at
              FROM photos
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, new: NewPhoto) -> StoreResult<Photo> {
        let row = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (title, caption, photo_url, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, caption, photo_url, user_id, created_at, updated_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.caption)
        .bind(&new.photo_url)
        .bind(new.user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn save(&self, photo: &Photo) -> StoreResult<Photo> {
        let row = sqlx::query_as::<_, Photo>(
            r#"
            UPDATE photos
               SET title = $2, caption = $3, photo_url = $4, updated_at = now()
             WHERE id = $1
            RETURNING id, title, caption, photo_url, user_id, created_at, updated_at
            "#,
        )
        .bind(photo.id)
        .bind(&photo.title)
        .bind(&photo.caption)
        .bind(&photo.photo_url)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

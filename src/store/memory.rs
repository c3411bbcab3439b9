//! In-memory `UserRepo` + `PhotoRepo` used to run the router without Postgres.

use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult};
use crate::photos::{
    repo::PhotoRepo,
    repo_types::{NewPhoto, Photo, PhotoView},
};
use crate::users::{
    repo::UserRepo,
    repo_types::{NewUser, User},
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    photos: BTreeMap<i64, Photo>,
    next_user_id: i64,
    next_photo_id: i64,
}

impl Tables {
    /// Mirrors the unique constraints on `users`.
    fn check_unique(&self, id: Option<i64>, username: &str, email: &str) -> StoreResult<()> {
        for u in self.users.values().filter(|u| Some(u.id) != id) {
            if u.email == email {
                return Err(StoreError::Duplicate("Email"));
            }
            if u.username == username {
                return Err(StoreError::Duplicate("Username"));
            }
        }
        Ok(())
    }

    fn view(&self, p: &Photo) -> PhotoView {
        PhotoView {
            id: p.id,
            title: p.title.clone(),
            caption: p.caption.clone(),
            photo_url: p.photo_url.clone(),
            created_at: p.created_at,
            updated_at: p.updated_at,
            owner_email: self
                .users
                .get(&p.user_id)
                .map(|u| u.email.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        t.check_unique(None, &new.username, &new.email)?;
        t.next_user_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: t.next_user_id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        t.check_unique(Some(user.id), &user.username, &user.email)?;
        let stored = t
            .users
            .get_mut(&user.id)
            .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("user {} vanished", user.id)))?;
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.password_hash = user.password_hash.clone();
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if t.users.remove(&id).is_none() {
            return Ok(false);
        }
        t.photos.retain(|_, p| p.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl PhotoRepo for MemoryStore {
    async fn list_by_owner(&self, owner_id: i64) -> StoreResult<Vec<PhotoView>> {
        let t = self.tables.read().await;
        let mut rows: Vec<PhotoView> = t
            .photos
            .values()
            .filter(|p| p.user_id == owner_id)
            .map(|p| t.view(p))
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn find_view(&self, id: i64, owner_id: i64) -> StoreResult<Option<PhotoView>> {
        let t = self.tables.read().await;
        Ok(t
            .photos
            .get(&id)
            .filter(|p| p.user_id == owner_id)
            .map(|p| t.view(p)))
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> StoreResult<Option<Photo>> {
        let t = self.tables.read().await;
        Ok(t.photos.get(&id).filter(|p| p.user_id == owner_id).cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Photo>> {
        Ok(self.tables.read().await.photos.get(&id).cloned())
    }

    async fn create(&self, new: NewPhoto) -> StoreResult<Photo> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&new.user_id) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "photo owner {} does not exist",
                new.user_id
            )));
        }
        t.next_photo_id += 1;
        let now = OffsetDateTime::now_utc();
        let photo = Photo {
            id: t.next_photo_id,
            title: new.title,
            caption: new.caption,
            photo_url: new.photo_url,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        t.photos.insert(photo.id, photo.clone());
        Ok(photo)
    }

    async fn save(&self, photo: &Photo) -> StoreResult<Photo> {
        let mut t = self.tables.write().await;
        let stored = t
            .photos
            .get_mut(&photo.id)
            .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("photo {} vanished", photo.id)))?;
        stored.title = photo.title.clone();
        stored.caption = photo.caption.clone();
        stored.photo_url = photo.photo_url.clone();
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.photos.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.into(),
            email: format!("{name}@x.com"),
            password_hash: "$argon2id$stub".into(),
        }
    }

    fn new_photo(owner: i64, title: &str) -> NewPhoto {
        NewPhoto {
            title: title.into(),
            caption: None,
            photo_url: "https://x.com/p.png".into(),
            user_id: owner,
        }
    }

    #[tokio::test]
    async fn duplicate_email_and_username_are_rejected() {
        let store = MemoryStore::new();
        UserRepo::create(&store, new_user("alice")).await.unwrap();

        let mut same_email = new_user("alice2");
        same_email.email = "alice@x.com".into();
        assert!(matches!(
            UserRepo::create(&store, same_email).await,
            Err(StoreError::Duplicate("Email"))
        ));

        let mut same_name = new_user("alice");
        same_name.email = "other@x.com".into();
        assert!(matches!(
            UserRepo::create(&store, same_name).await,
            Err(StoreError::Duplicate("Username"))
        ));
    }

    #[tokio::test]
    async fn save_may_keep_own_values_but_not_take_others() {
        let store = MemoryStore::new();
        let mut alice = UserRepo::create(&store, new_user("alice")).await.unwrap();
        UserRepo::create(&store, new_user("bob")).await.unwrap();

        alice.username = "alice".into();
        assert!(UserRepo::save(&store, &alice).await.is_ok());

        alice.email = "bob@x.com".into();
        assert!(matches!(
            UserRepo::save(&store, &alice).await,
            Err(StoreError::Duplicate("Email"))
        ));
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_photos() {
        let store = MemoryStore::new();
        let alice = UserRepo::create(&store, new_user("alice")).await.unwrap();
        let bob = UserRepo::create(&store, new_user("bob")).await.unwrap();
        PhotoRepo::create(&store, new_photo(alice.id, "a")).await.unwrap();
        let bobs = PhotoRepo::create(&store, new_photo(bob.id, "b")).await.unwrap();

        assert!(UserRepo::delete(&store, alice.id).await.unwrap());
        assert!(store.list_by_owner(alice.id).await.unwrap().is_empty());
        assert!(PhotoRepo::find_by_id(&store, bobs.id).await.unwrap().is_some());
        assert!(!UserRepo::delete(&store, alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn owner_scoped_lookups_hide_foreign_photos() {
        let store = MemoryStore::new();
        let alice = UserRepo::create(&store, new_user("alice")).await.unwrap();
        let bob = UserRepo::create(&store, new_user("bob")).await.unwrap();
        let photo = PhotoRepo::create(&store, new_photo(bob.id, "b")).await.unwrap();

        assert!(store.find_owned(photo.id, alice.id).await.unwrap().is_none());
        assert!(store.find_view(photo.id, alice.id).await.unwrap().is_none());
        let view = store.find_view(photo.id, bob.id).await.unwrap().unwrap();
        assert_eq!(view.owner_email, "bob@x.com");
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        let alice = UserRepo::create(&store, new_user("alice")).await.unwrap();
        for title in ["first", "second", "third"] {
            PhotoRepo::create(&store, new_photo(alice.id, title)).await.unwrap();
        }
        let titles: Vec<String> = store
            .list_by_owner(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);
    }
}

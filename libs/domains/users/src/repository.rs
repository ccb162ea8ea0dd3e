use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{Note, User, UserView};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, password excluded
    async fn list_views(&self) -> UserResult<Vec<UserView>>;

    /// Full record, hash included
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn find_by_username(&self, username: &str) -> UserResult<Option<UserView>>;

    /// Persist a new user. `None` means the store did not acknowledge the record.
    async fn create(&self, user: User) -> UserResult<Option<UserView>>;

    /// Replace an existing record
    async fn save(&self, user: User) -> UserResult<UserView>;

    /// Whether a record was removed
    async fn delete(&self, id: Uuid) -> UserResult<bool>;
}

/// Ownership lookups on notes, needed to guard user deletion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn exists_for_user(&self, user_id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_views(&self) -> UserResult<Vec<UserView>> {
        let users = self.users.read().await;

        let mut views: Vec<UserView> = users.values().map(UserView::from).collect();
        // v7 ids sort by creation time
        views.sort_by_key(|view| view.id);
        Ok(views)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<UserView>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username == username)
            .map(UserView::from))
    }

    async fn create(&self, user: User) -> UserResult<Option<UserView>> {
        let mut users = self.users.write().await;
        let view = user.view();
        users.insert(user.id, user);

        tracing::debug!(user_id = %view.id, "Stored user");
        Ok(Some(view))
    }

    async fn save(&self, user: User) -> UserResult<UserView> {
        let mut users = self.users.write().await;

        let Some(stored) = users.get_mut(&user.id) else {
            return Err(UserError::NotFound(user.id.to_string()));
        };
        *stored = user;

        Ok(stored.view())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).is_some())
    }
}

/// In-memory implementation of NoteRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryNoteRepository {
    notes: Arc<RwLock<HashMap<Uuid, Note>>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a note.
    pub async fn insert(&self, note: Note) {
        self.notes.write().await.insert(note.id, note);
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn exists_for_user(&self, user_id: Uuid) -> UserResult<bool> {
        let notes = self.notes.read().await;
        Ok(notes.values().any(|note| note.user == user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User::new(name.to_string(), "hash".to_string(), vec!["Employee".to_string()])
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        let dave = user("dave");

        let created = repo.create(dave.clone()).await.unwrap().unwrap();
        assert_eq!(created.username, "dave");

        let found = repo.find_by_id(dave.id).await.unwrap().unwrap();
        assert_eq!(found, dave);
    }

    #[tokio::test]
    async fn test_find_by_username_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("Dave")).await.unwrap();

        assert!(repo.find_by_username("Dave").await.unwrap().is_some());
        assert!(repo.find_by_username("dave").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_views_in_creation_order() {
        let repo = InMemoryUserRepository::new();
        for name in ["a", "b", "c"] {
            repo.create(user(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_views()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.username)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_save_replaces_record() {
        let repo = InMemoryUserRepository::new();
        let mut dave = user("dave");
        repo.create(dave.clone()).await.unwrap();

        dave.active = false;
        let saved = repo.save(dave.clone()).await.unwrap();

        assert!(!saved.active);
        assert_eq!(repo.find_by_id(dave.id).await.unwrap(), Some(dave));
    }

    #[tokio::test]
    async fn test_save_unknown_user_fails() {
        let repo = InMemoryUserRepository::new();
        let result = repo.save(user("ghost")).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let dave = user("dave");
        repo.create(dave.clone()).await.unwrap();

        assert!(repo.delete(dave.id).await.unwrap());
        assert!(!repo.delete(dave.id).await.unwrap());
        assert!(repo.find_by_id(dave.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_notes_exist_for_owner_only() {
        let notes = InMemoryNoteRepository::new();
        let owner = Uuid::now_v7();
        notes.insert(Note::new(owner)).await;

        assert!(notes.exists_for_user(owner).await.unwrap());
        assert!(!notes.exists_for_user(Uuid::now_v7()).await.unwrap());
    }
}

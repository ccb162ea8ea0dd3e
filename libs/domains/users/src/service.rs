use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, DeleteUser, MessageResponse, UpdateUser, User, UserView, messages,
};
use crate::password::Argon2Hasher;
use crate::repository::{NoteRepository, UserRepository};

/// Service layer for User business logic.
///
/// Persistence is injected: any [`UserRepository`] / [`NoteRepository`] pair works,
/// in-memory doubles included.
pub struct UserService<R: UserRepository, N: NoteRepository> {
    users: Arc<R>,
    notes: Arc<N>,
    hasher: Argon2Hasher,
}

impl<R: UserRepository, N: NoteRepository> Clone for UserService<R, N> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            notes: Arc::clone(&self.notes),
            hasher: self.hasher.clone(),
        }
    }
}

/// Ids that are not UUIDs cannot belong to any stored user.
fn parse_user_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

impl<R: UserRepository, N: NoteRepository> UserService<R, N> {
    pub fn new(users: R, notes: N) -> Self {
        Self {
            users: Arc::new(users),
            notes: Arc::new(notes),
            hasher: Argon2Hasher::default(),
        }
    }

    pub fn with_password_hasher(mut self, hasher: Argon2Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// All users without their passwords. An empty store is an error.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<UserView>> {
        let users = self.users.list_views().await?;

        if users.is_empty() {
            return Err(UserError::NoUsersFound);
        }

        Ok(users)
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<MessageResponse> {
        input
            .validate()
            .map_err(|_| UserError::InvalidInput(messages::CREATE_FIELDS_REQUIRED))?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(UserError::DuplicateUsername(input.username));
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let user = User::new(input.username, password_hash, input.roles);

        let created = self
            .users
            .create(user)
            .await?
            .ok_or(UserError::InvalidUserData)?;

        info!(user_id = %created.id, "User created");
        Ok(MessageResponse::new(format!(
            "New user {} created",
            created.username
        )))
    }

    /// Overwrite username, roles and active flag; re-hash only when a password is given.
    #[instrument(skip(self, input), fields(user_id = %input.id))]
    pub async fn update_user(&self, input: UpdateUser) -> UserResult<MessageResponse> {
        input
            .validate()
            .map_err(|_| UserError::InvalidInput(messages::UPDATE_FIELDS_REQUIRED))?;

        let existing = match parse_user_id(&input.id) {
            Some(id) => self.users.find_by_id(id).await?,
            None => None,
        };
        let mut user = existing.ok_or_else(|| UserError::NotFound(input.id.clone()))?;

        if let Some(holder) = self.users.find_by_username(&input.username).await? {
            if holder.id != user.id {
                return Err(UserError::UsernameTaken(input.username));
            }
        }

        let new_password_hash = match input.password.as_deref() {
            Some(password) if !password.is_empty() => Some(self.hasher.hash(password)?),
            _ => None,
        };

        user.apply_update(input, new_password_hash);
        let saved = self.users.save(user).await?;

        info!(user_id = %saved.id, "User updated");
        Ok(MessageResponse::new(format!("{} updated", saved.username)))
    }

    /// Remove a user that owns no notes. Returns the confirmation text.
    #[instrument(skip(self, input), fields(user_id = %input.id))]
    pub async fn delete_user(&self, input: DeleteUser) -> UserResult<String> {
        input
            .validate()
            .map_err(|_| UserError::InvalidInput(messages::USER_ID_REQUIRED))?;

        let Some(id) = parse_user_id(&input.id) else {
            return Err(UserError::NotFound(input.id));
        };

        if self.notes.exists_for_user(id).await? {
            return Err(UserError::HasAssignedNotes(input.id));
        }

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(input.id.clone()))?;

        if !self.users.delete(id).await? {
            return Err(UserError::NotFound(input.id));
        }

        info!(user_id = %id, "User deleted");
        Ok(format!("Username {} with ID {} deleted", user.username, user.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockNoteRepository, MockUserRepository};
    use mockall::predicate::eq;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(8, 1, 1).unwrap()
    }

    fn service(
        users: MockUserRepository,
        notes: MockNoteRepository,
    ) -> UserService<MockUserRepository, MockNoteRepository> {
        UserService::new(users, notes).with_password_hasher(hasher())
    }

    fn stored(username: &str) -> User {
        User::new(
            username.to_string(),
            hasher().hash("old-secret").unwrap(),
            vec!["Employee".to_string()],
        )
    }

    fn create_input(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            password: "secret".to_string(),
            roles: vec!["Employee".to_string()],
        }
    }

    fn update_input(user: &User, username: &str, password: Option<&str>) -> UpdateUser {
        UpdateUser {
            id: user.id.to_string(),
            username: username.to_string(),
            roles: vec!["Manager".to_string()],
            active: false,
            password: password.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_list_users_empty_is_error() {
        let mut users = MockUserRepository::new();
        users.expect_list_views().returning(|| Ok(vec![]));

        let result = service(users, MockNoteRepository::new()).list_users().await;
        assert!(matches!(result, Err(UserError::NoUsersFound)));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .with(eq("dave"))
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|user| {
                user.username == "dave"
                    && user.password != "secret"
                    && hasher().verify("secret", &user.password).unwrap()
                    && user.active
            })
            .times(1)
            .returning(|user| Ok(Some(user.view())));

        let response = service(users, MockNoteRepository::new())
            .create_user(create_input("dave"))
            .await
            .unwrap();

        assert_eq!(response.message, "New user dave created");
    }

    #[tokio::test]
    async fn test_create_duplicate_never_writes() {
        let existing = stored("dave").view();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_create().never();

        let result = service(users, MockNoteRepository::new())
            .create_user(create_input("dave"))
            .await;

        assert!(matches!(result, Err(UserError::DuplicateUsername(name)) if name == "dave"));
    }

    #[tokio::test]
    async fn test_create_declined_write_is_invalid_user_data() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_create().returning(|_| Ok(None));

        let result = service(users, MockNoteRepository::new())
            .create_user(create_input("dave"))
            .await;

        assert!(matches!(result, Err(UserError::InvalidUserData)));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_roles_before_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().never();

        let mut input = create_input("dave");
        input.roles.clear();

        let result = service(users, MockNoteRepository::new())
            .create_user(input)
            .await;

        assert!(matches!(
            result,
            Err(UserError::InvalidInput(messages::CREATE_FIELDS_REQUIRED))
        ));
    }

    #[tokio::test]
    async fn test_update_without_password_keeps_hash() {
        let user = stored("dave");
        let original_hash = user.password.clone();
        let found = user.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(user.id))
            .returning(move |_| Ok(Some(found.clone())));
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_save()
            .withf(move |saved| {
                saved.password == original_hash
                    && saved.username == "david"
                    && saved.roles == vec!["Manager".to_string()]
                    && !saved.active
            })
            .times(1)
            .returning(|saved| Ok(saved.view()));

        let response = service(users, MockNoteRepository::new())
            .update_user(update_input(&user, "david", None))
            .await
            .unwrap();

        assert_eq!(response.message, "david updated");
    }

    #[tokio::test]
    async fn test_update_with_password_rehashes() {
        let user = stored("dave");
        let found = user.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_save()
            .withf(|saved| hasher().verify("new-secret", &saved.password).unwrap())
            .times(1)
            .returning(|saved| Ok(saved.view()));

        service(users, MockNoteRepository::new())
            .update_user(update_input(&user, "dave", Some("new-secret")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_keeping_own_username_is_allowed() {
        let user = stored("dave");
        let found = user.clone();
        let own_view = user.view();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(own_view.clone())));
        users.expect_save().returning(|saved| Ok(saved.view()));

        let result = service(users, MockNoteRepository::new())
            .update_user(update_input(&user, "dave", None))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_username_held_by_other_user() {
        let user = stored("dave");
        let other = stored("erin").view();
        let found = user.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(other.clone())));
        users.expect_save().never();

        let result = service(users, MockNoteRepository::new())
            .update_user(update_input(&user, "erin", None))
            .await;

        assert!(matches!(result, Err(UserError::UsernameTaken(_))));
    }

    #[tokio::test]
    async fn test_update_unparseable_id_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();

        let input = UpdateUser {
            id: "12345".to_string(),
            username: "dave".to_string(),
            roles: vec!["Employee".to_string()],
            active: true,
            password: None,
        };

        let result = service(users, MockNoteRepository::new())
            .update_user(input)
            .await;

        assert!(matches!(result, Err(UserError::NotFound(id)) if id == "12345"));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_notes_checks_notes_first() {
        let user_id = Uuid::now_v7();

        let mut notes = MockNoteRepository::new();
        notes
            .expect_exists_for_user()
            .with(eq(user_id))
            .returning(|_| Ok(true));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();
        users.expect_delete().never();

        let result = service(users, notes)
            .delete_user(DeleteUser {
                id: user_id.to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::HasAssignedNotes(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_username_and_id() {
        let user = stored("dave");
        let found = user.clone();

        let mut notes = MockNoteRepository::new();
        notes.expect_exists_for_user().returning(|_| Ok(false));

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users
            .expect_delete()
            .with(eq(user.id))
            .times(1)
            .returning(|_| Ok(true));

        let reply = service(users, notes)
            .delete_user(DeleteUser {
                id: user.id.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(reply, format!("Username dave with ID {} deleted", user.id));
    }

    #[tokio::test]
    async fn test_delete_unknown_user() {
        let mut notes = MockNoteRepository::new();
        notes.expect_exists_for_user().returning(|_| Ok(false));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        users.expect_delete().never();

        let result = service(users, notes)
            .delete_user(DeleteUser {
                id: Uuid::now_v7().to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_database_errors_propagate() {
        let mut users = MockUserRepository::new();
        users
            .expect_list_views()
            .returning(|| Err(UserError::Database("connection reset".into())));

        let result = service(users, MockNoteRepository::new()).list_users().await;
        assert!(matches!(result, Err(UserError::Database(_))));
    }
}

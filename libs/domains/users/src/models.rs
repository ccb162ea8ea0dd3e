use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Validation messages, one per operation.
pub mod messages {
    pub const CREATE_FIELDS_REQUIRED: &str = "All fields are required";
    pub const UPDATE_FIELDS_REQUIRED: &str = "All fields except password are required";
    pub const USER_ID_REQUIRED: &str = "User ID Required";
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    /// Unique, compared case-sensitively
    pub username: String,
    /// Argon2 PHC string, never the plaintext
    pub password: String,
    pub roles: Vec<String>,
    pub active: bool,
}

impl User {
    /// New active user with a fresh time-ordered id.
    pub fn new(username: String, password_hash: String, roles: Vec<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            username,
            password: password_hash,
            roles,
            active: true,
        }
    }

    /// Overwrite the mutable fields; the hash only changes when a new one is given.
    pub fn apply_update(&mut self, input: UpdateUser, new_password_hash: Option<String>) {
        self.username = input.username;
        self.roles = input.roles;
        self.active = input.active;

        if let Some(hash) = new_password_hash {
            self.password = hash;
        }
    }

    pub fn view(&self) -> UserView {
        UserView::from(self)
    }
}

/// User as returned to clients: every field except the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            roles: user.roles.clone(),
            active: user.active,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles,
            active: user.active,
        }
    }
}

/// Note owned by a user. Only ownership matters to this domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    /// Id of the owning user
    pub user: Uuid,
}

impl Note {
    pub fn new(user: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub roles: Vec<String>,
}

/// Input for updating a user.
///
/// `id` stays textual: an id that is not a UUID simply matches no user.
#[derive(Debug, Clone, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub roles: Vec<String>,
    pub active: bool,
    /// `None` keeps the stored hash
    pub password: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct DeleteUser {
    #[validate(length(min = 1))]
    pub id: String,
}

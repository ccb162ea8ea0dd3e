use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

/// Failures of the user operations.
///
/// The `Display` text of every client-facing variant is the message returned to
/// the caller, so it must stay stable.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("No user found!")]
    NoUsersFound,

    #[error("{0}")]
    InvalidInput(&'static str),

    /// Raised on create; surfaces as 409.
    #[error("Duplicate username!")]
    DuplicateUsername(String),

    /// Raised on update when another user holds the name.
    #[error("Duplicate username")]
    UsernameTaken(String),

    #[error("Invalid user data received")]
    InvalidUserData,

    #[error("User not found")]
    NotFound(String),

    #[error("User has assigned notes")]
    HasAssignedNotes(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::InvalidInput(_) => AppError::Validation(message),
            UserError::DuplicateUsername(_) => AppError::Conflict(message),
            UserError::NoUsersFound
            | UserError::UsernameTaken(_)
            | UserError::InvalidUserData
            | UserError::NotFound(_)
            | UserError::HasAssignedNotes(_) => AppError::BadRequest(message),
            UserError::PasswordHash(_) | UserError::Database(_) => {
                AppError::InternalServerError(message)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

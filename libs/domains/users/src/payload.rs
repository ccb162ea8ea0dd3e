//! Request bodies as sent by clients.
//!
//! Every field is optional and accepts any JSON type, so a wrong type is reported
//! with the operation's own message instead of a deserializer error. `TryFrom`
//! turns a payload into the typed input and validates it.

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, DeleteUser, UpdateUser, messages};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateUserPayload {
    #[schema(value_type = String, example = "dave")]
    pub username: Option<Value>,
    #[schema(value_type = String, format = Password)]
    pub password: Option<Value>,
    #[schema(value_type = Vec<String>)]
    pub roles: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserPayload {
    #[schema(value_type = String)]
    pub id: Option<Value>,
    #[schema(value_type = String)]
    pub username: Option<Value>,
    #[schema(value_type = Vec<String>)]
    pub roles: Option<Value>,
    #[schema(value_type = bool)]
    pub active: Option<Value>,
    /// Omit, or send an empty string, to keep the current password
    #[schema(value_type = Option<String>, format = Password)]
    pub password: Option<Value>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeleteUserPayload {
    #[schema(value_type = String)]
    pub id: Option<Value>,
}

/// Absent and `null` become empty so validation reports them; other non-strings are rejected.
fn text(value: Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s),
        Some(_) => None,
    }
}

fn roles(value: Option<Value>) -> Option<Vec<String>> {
    match value {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(role) => Some(role),
                _ => None,
            })
            .collect(),
        Some(_) => None,
    }
}

fn optional_password(value: Option<Value>) -> Option<Option<String>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) if s.is_empty() => Some(None),
        Some(Value::String(s)) => Some(Some(s)),
        Some(_) => None,
    }
}

fn validated<T: Validate>(input: T, message: &'static str) -> UserResult<T> {
    input
        .validate()
        .map_err(|_| UserError::InvalidInput(message))?;
    Ok(input)
}

impl TryFrom<CreateUserPayload> for CreateUser {
    type Error = UserError;

    fn try_from(payload: CreateUserPayload) -> UserResult<Self> {
        let invalid = || UserError::InvalidInput(messages::CREATE_FIELDS_REQUIRED);

        let input = CreateUser {
            username: text(payload.username).ok_or_else(invalid)?,
            password: text(payload.password).ok_or_else(invalid)?,
            roles: roles(payload.roles).ok_or_else(invalid)?,
        };

        validated(input, messages::CREATE_FIELDS_REQUIRED)
    }
}

impl TryFrom<UpdateUserPayload> for UpdateUser {
    type Error = UserError;

    fn try_from(payload: UpdateUserPayload) -> UserResult<Self> {
        let invalid = || UserError::InvalidInput(messages::UPDATE_FIELDS_REQUIRED);

        let active = match payload.active {
            Some(Value::Bool(active)) => active,
            _ => return Err(invalid()),
        };

        let input = UpdateUser {
            id: text(payload.id).ok_or_else(invalid)?,
            username: text(payload.username).ok_or_else(invalid)?,
            roles: roles(payload.roles).ok_or_else(invalid)?,
            active,
            password: optional_password(payload.password).ok_or_else(invalid)?,
        };

        validated(input, messages::UPDATE_FIELDS_REQUIRED)
    }
}

impl TryFrom<DeleteUserPayload> for DeleteUser {
    type Error = UserError;

    fn try_from(payload: DeleteUserPayload) -> UserResult<Self> {
        let id = text(payload.id).ok_or(UserError::InvalidInput(messages::USER_ID_REQUIRED))?;
        validated(DeleteUser { id }, messages::USER_ID_REQUIRED)
    }
}

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppJson,
    errors::responses::{BadRequestResponse, ConflictResponse, InternalServerErrorResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{CreateUser, DeleteUser, MessageResponse, UpdateUser, UserView};
use crate::payload::{CreateUserPayload, DeleteUserPayload, UpdateUserPayload};
use crate::repository::{NoteRepository, UserRepository};
use crate::service::UserService;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user, delete_user),
    components(
        schemas(
            UserView,
            MessageResponse,
            CreateUserPayload,
            UpdateUserPayload,
            DeleteUserPayload
        ),
        responses(BadRequestResponse, ConflictResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Users", description = "User management endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<R, N> = State<Arc<UserService<R, N>>>;

/// A request without a body is treated like `{}`, so it reaches field validation.
fn body_or_default<T: Default>(payload: Option<AppJson<T>>) -> T {
    payload.map(|AppJson(body)| body).unwrap_or_default()
}

/// Create the users router. Every operation lives on `/`; ids travel in the body.
pub fn router<R, N>(service: UserService<R, N>) -> Router
where
    R: UserRepository + 'static,
    N: NoteRepository + 'static,
{
    Router::new()
        .route(
            "/",
            get(list_users)
                .post(create_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .with_state(Arc::new(service))
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    responses(
        (status = 200, description = "Users without passwords", body = Vec<UserView>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository, N: NoteRepository>(
    State(service): SharedService<R, N>,
) -> UserResult<Json<Vec<UserView>>> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository, N: NoteRepository>(
    State(service): SharedService<R, N>,
    payload: Option<AppJson<CreateUserPayload>>,
) -> UserResult<impl IntoResponse> {
    let input = CreateUser::try_from(body_or_default(payload))?;
    let response = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a user; the password is only changed when one is sent
#[utoipa::path(
    patch,
    path = "",
    tag = "Users",
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository, N: NoteRepository>(
    State(service): SharedService<R, N>,
    payload: Option<AppJson<UpdateUserPayload>>,
) -> UserResult<Json<MessageResponse>> {
    let input = UpdateUser::try_from(body_or_default(payload))?;
    let response = service.update_user(input).await?;
    Ok(Json(response))
}

/// Delete a user that has no assigned notes
#[utoipa::path(
    delete,
    path = "",
    tag = "Users",
    request_body = DeleteUserPayload,
    responses(
        (status = 200, description = "Confirmation text", body = String,
            example = json!("Username dave with ID 0190f5f2-0000-7000-8000-000000000000 deleted")),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository, N: NoteRepository>(
    State(service): SharedService<R, N>,
    payload: Option<AppJson<DeleteUserPayload>>,
) -> UserResult<Json<String>> {
    let input = DeleteUser::try_from(body_or_default(payload))?;
    let reply = service.delete_user(input).await?;
    Ok(Json(reply))
}

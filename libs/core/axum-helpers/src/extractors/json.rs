use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, OptionalFromRequest, Request},
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};

/// `Json` wrapper whose rejection is an [`AppError`].
///
/// Malformed bodies and wrong content types produce the same `ErrorResponse`
/// shape as every other failure instead of axum's plain-text rejection.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::AppJson;
///
/// async fn create(AppJson(payload): AppJson<CreatePayload>) -> AppJson<Created> {
///     AppJson(service.create(payload).await?)
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

/// `Option<AppJson<T>>` is `None` when the request carries no body at all
/// (no `Content-Type`, or `Content-Length: 0`). A body that is present but
/// malformed is still rejected.
impl<T, S> OptionalFromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let headers = req.headers();
        let empty = !headers.contains_key(CONTENT_TYPE)
            || headers
                .get(CONTENT_LENGTH)
                .is_some_and(|len| len.as_bytes() == b"0");

        if empty {
            return Ok(None);
        }

        let AppJson(value) = <AppJson<T> as FromRequest<S>>::from_request(req, state).await?;
        Ok(Some(AppJson(value)))
    }
}

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::credential::errors::AuthError;

pub mod login;
pub mod me;
pub mod ping;
pub mod register;

/// Message shared by every failed login, whatever the cause.
pub const LOGIN_FAILED_MESSAGE: &str = "invalid email or password";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, payload: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody::new(status, message, Some(payload))),
        )
    }
}

impl ApiSuccess<()> {
    pub fn without_payload(status: StatusCode, message: impl Into<String>) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, message, None)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized {
        message: String,
        reason: Option<String>,
    },
}

impl ApiError {
    pub fn login_failed() -> Self {
        ApiError::NotFound(LOGIN_FAILED_MESSAGE.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, reason) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Unauthorized { message, reason } => {
                (StatusCode::UNAUTHORIZED, message, reason)
            }
        };

        (status, Json(ApiResponseBody::new(status, message, reason))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(_) => ApiError::BadRequest(err.to_string()),
            AuthError::NotFound(_) | AuthError::InvalidCredentials => ApiError::login_failed(),
            AuthError::MalformedHeader => ApiError::Unauthorized {
                message: "UNAUTHORIZED".to_string(),
                reason: None,
            },
            AuthError::Token(e) => ApiError::Unauthorized {
                message: "Invalid Token".to_string(),
                reason: Some(e.to_string()),
            },
            AuthError::Hashing(_) | AuthError::Store(_) => {
                // Driver and hashing details stay in the logs
                tracing::error!(error = %err, "Request failed with internal error");
                ApiError::InternalServerError("internal server error".to_string())
            }
        }
    }
}

/// Response envelope shared by every endpoint.
///
/// `payload` is left out of the JSON entirely when there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<T>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, message: impl Into<String>, payload: Option<T>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message: message.into(),
            payload,
        }
    }
}

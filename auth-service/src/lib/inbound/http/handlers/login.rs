use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body?;

    // A malformed email cannot have been registered, so it fails like an unknown one
    let command = LoginCommand::new(body.email, body.password).map_err(|e| {
        tracing::warn!(error = %e, "Login rejected");
        ApiError::login_failed()
    })?;

    state
        .auth_service
        .login(command)
        .await
        .map_err(|e| {
            if matches!(e, AuthError::NotFound(_) | AuthError::InvalidCredentials) {
                tracing::warn!(error = %e, "Login rejected");
            }
            ApiError::from(e)
        })
        .map(|token| {
            ApiSuccess::new(StatusCode::OK, "LOGIN SUCCESS", LoginResponseData { token })
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}

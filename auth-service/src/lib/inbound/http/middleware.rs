use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::credential::models::CredentialId;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated subject in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedSubject {
    pub subject_id: CredentialId,
}

/// Middleware that validates the bearer token and adds the subject to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A missing or non-ASCII header is checked like an empty one
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let subject_id = state.auth_service.verify_request(header).map_err(|e| {
        tracing::warn!(error = %e, "Request authentication failed");
        ApiError::from(e)
    })?;

    req.extensions_mut()
        .insert(AuthenticatedSubject { subject_id });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use auth::Authenticator;
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::domain::credential::errors::AuthError;
    use crate::domain::credential::models::Credential;
    use crate::domain::credential::models::EmailAddress;
    use crate::domain::credential::models::NewCredential;
    use crate::domain::credential::ports::CredentialStore;
    use crate::domain::credential::service::AuthService;
    use crate::inbound::http::router::create_router;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    struct EmptyStore;

    #[async_trait]
    impl CredentialStore for EmptyStore {
        async fn insert(&self, _credential: NewCredential) -> Result<(), AuthError> {
            Ok(())
        }

        async fn find_by_email(
            &self,
            _email: &EmailAddress,
        ) -> Result<Option<Credential>, AuthError> {
            Ok(None)
        }
    }

    fn router() -> axum::Router {
        let service = AuthService::new(Arc::new(EmptyStore), Arc::new(Authenticator::new(SECRET)));
        create_router(Arc::new(service))
    }

    async fn call(authorization: Option<String>) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().uri("/v1/auth/me");
        if let Some(value) = authorization {
            request = request.header("Authorization", value);
        }

        let response = router()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_attaches_subject() {
        let token = Authenticator::new(SECRET).issue_token(99).unwrap();

        let (status, body) = call(Some(format!("bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payload"], json!({ "subject_id": 99 }));
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let (status, body) = call(None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "status_code": 401, "message": "UNAUTHORIZED" }));
    }

    #[tokio::test]
    async fn test_foreign_token_is_rejected() {
        let token = Authenticator::new(b"another_secret_key_at_least_32_bytes")
            .issue_token(99)
            .unwrap();

        let (status, body) = call(Some(format!("bearer {}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({
                "status_code": 401,
                "message": "Invalid Token",
                "payload": "Token signature is invalid"
            })
        );
    }
}

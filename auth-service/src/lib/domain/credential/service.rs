use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use tokio::task;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::models::NewCredential;
use crate::domain::credential::models::RegisterCommand;
use crate::domain::credential::ports::AuthServicePort;
use crate::domain::credential::ports::CredentialStore;

const BEARER_PREFIX: &str = "bearer ";

/// Domain service implementation for authentication.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Argon2 work runs on the blocking pool so request tasks are never stalled.
pub struct AuthService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
}

impl<CS> AuthService<CS>
where
    CS: CredentialStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Password hasher and token codec, keyed with the signing secret
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

#[async_trait]
impl<CS> AuthServicePort for AuthService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<(), AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash = task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))??;

        let email = command.email;
        self.store
            .insert(NewCredential {
                name: command.name,
                email: email.clone(),
                password_hash,
            })
            .await?;

        tracing::info!(email = %email, "Credential registered");

        Ok(())
    }

    async fn login(&self, command: LoginCommand) -> Result<String, AuthError> {
        let credential = self
            .store
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| AuthError::NotFound(command.email.to_string()))?;

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let subject_id = credential.id;
        let result = task::spawn_blocking(move || {
            authenticator.authenticate(&password, &credential.password_hash, subject_id.0)
        })
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))??;

        tracing::info!(subject_id = %subject_id, "Access token issued");

        Ok(result.access_token)
    }

    fn verify_request(&self, authorization_header: &str) -> Result<CredentialId, AuthError> {
        let token = bearer_token(authorization_header)?;
        let payload = self.authenticator.validate_token(token)?;

        Ok(CredentialId(payload.subject_id))
    }
}

/// Extract the token from a `bearer <token>` header value.
///
/// The scheme is matched case-sensitively and exactly one non-empty token
/// segment must follow it.
fn bearer_token(header: &str) -> Result<&str, AuthError> {
    match header.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() && !token.contains(char::is_whitespace) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

use async_trait::async_trait;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::models::Credential;
use crate::domain::credential::models::CredentialId;
use crate::domain::credential::models::EmailAddress;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::models::NewCredential;
use crate::domain::credential::models::RegisterCommand;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new credential.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, email, and password
    ///
    /// # Errors
    /// * `Hashing` - Password hashing failed
    /// * `Store` - Insert failed (including an already registered email)
    async fn register(&self, command: RegisterCommand) -> Result<(), AuthError>;

    /// Verify an email and password and issue an access token.
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `NotFound` - No credential registered for the email
    /// * `InvalidCredentials` - Password does not match
    /// * `Store` - Lookup failed
    /// * `Hashing` - Stored hash is malformed
    /// * `Token` - Token encoding failed
    async fn login(&self, command: LoginCommand) -> Result<String, AuthError>;

    /// Check an `Authorization` header value and return the token's subject.
    ///
    /// # Arguments
    /// * `authorization_header` - Raw header value, expected as `bearer <token>`
    ///
    /// # Errors
    /// * `MalformedHeader` - Header is not exactly `bearer <token>`
    /// * `Token` - Token is malformed, wrongly signed, or expired
    fn verify_request(&self, authorization_header: &str) -> Result<CredentialId, AuthError>;
}

/// Persistence operations for credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new credential.
    ///
    /// # Errors
    /// * `Store` - Insert failed, including a duplicate email
    async fn insert(&self, credential: NewCredential) -> Result<(), AuthError>;

    /// Retrieve a credential by email address.
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `Store` - Lookup failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credential>, AuthError>;
}

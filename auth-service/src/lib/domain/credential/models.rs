use std::fmt;
use std::str::FromStr;

use crate::domain::credential::errors::AuthError;
use crate::domain::credential::errors::EmailError;

/// Stored login credential.
///
/// `password_hash` is a PHC string and never leaves the service.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: CredentialId,
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Credential identifier, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId(pub i64);

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email is empty or does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Record handed to the store on registration
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Command to register a new credential
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: String,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    /// Construct a register command, validating the email address.
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `email` - Raw email string
    /// * `password` - Plain text password (will be hashed by service)
    ///
    /// # Errors
    /// * `Validation` - Email is empty or malformed
    pub fn new(name: String, email: String, password: String) -> Result<Self, AuthError> {
        Ok(Self {
            name,
            email: EmailAddress::new(email)?,
            password,
        })
    }
}

/// Command to log in with an email and password
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: String, password: String) -> Result<Self, AuthError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_address_valid() {
        let email = EmailAddress::new("a@x.com".to_string()).unwrap();
        assert_eq!(email.as_str(), "a@x.com");
    }

    #[test]
    fn test_email_address_invalid() {
        for raw in ["", "not-an-email", "@x.com", "a@"] {
            assert!(
                matches!(
                    EmailAddress::new(raw.to_string()),
                    Err(EmailError::InvalidFormat(_))
                ),
                "expected {:?} to be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_register_command_rejects_invalid_email() {
        let result = RegisterCommand::new(
            "Alice".to_string(),
            "not-an-email".to_string(),
            "secret123".to_string(),
        );

        assert!(matches!(result, Err(AuthError::Validation(_))));
    }
}

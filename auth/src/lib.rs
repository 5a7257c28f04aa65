//! Credential authentication library
//!
//! Provides the credential verification and token lifecycle primitives:
//! - Password hashing (Argon2id)
//! - Access token encoding and validation (HS256 JWT, fixed 600 second lifetime)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{TokenCodec, TokenPayload};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let token = codec.encode(TokenPayload::for_subject(42)).unwrap();
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded.subject_id, 42);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, 42).unwrap();
//!
//! // Validate token
//! let payload = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(payload.subject_id, 42);
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenPayload;
pub use token::TOKEN_TTL_SECONDS;

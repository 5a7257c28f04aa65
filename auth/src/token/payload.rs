use serde::Deserialize;
use serde::Serialize;

/// Signed body of an access token.
///
/// Serialized as-is into the token, so the claim set is exactly
/// `{subject_id, expires_at}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPayload {
    /// Identifier of the authenticated credential
    pub subject_id: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub expires_at: i64,
}

impl TokenPayload {
    /// Create a payload for a subject.
    ///
    /// The expiry is left unset; the codec stamps it when the token is issued.
    pub fn for_subject(subject_id: i64) -> Self {
        Self {
            subject_id,
            expires_at: 0,
        }
    }

    /// Check if the payload is expired.
    ///
    /// A token stops being valid at the instant of `expires_at`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.expires_at
    }
}

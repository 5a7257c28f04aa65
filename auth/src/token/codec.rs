use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::errors::TokenError;
use super::payload::TokenPayload;

/// Lifetime of every issued token, in seconds.
pub const TOKEN_TTL_SECONDS: i64 = 600;

/// Algorithms accepted on decode. Tokens are always issued with HS256.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Access token encoder and decoder.
///
/// Tokens are JWTs signed with HMAC-SHA256 under a single shared secret.
/// Expiry is checked against `expires_at` by the codec itself, with no leeway.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a new codec with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encode a payload into a signed token, expiring `TOKEN_TTL_SECONDS` from now.
    ///
    /// Any expiry already set on `payload` is overwritten.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, payload: TokenPayload) -> Result<String, TokenError> {
        self.encode_at(payload, Utc::now().timestamp())
    }

    /// Encode a payload as if issued at `issued_at` (Unix timestamp).
    pub fn encode_at(&self, payload: TokenPayload, issued_at: i64) -> Result<String, TokenError> {
        let expires_at = issued_at
            .checked_add(TOKEN_TTL_SECONDS)
            .ok_or_else(|| {
                TokenError::EncodingFailed(format!("expiry overflows for {}", issued_at))
            })?;
        let payload = TokenPayload {
            expires_at,
            ..payload
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token against the current time.
    ///
    /// # Returns
    /// Decoded payload
    ///
    /// # Errors
    /// * `Malformed` - Token structure, encoding or claims are invalid
    /// * `UnexpectedAlgorithm` - Header declares a non-HMAC algorithm
    /// * `InvalidSignature` - Signature does not verify under the secret
    /// * `Expired` - Current time is at or past `expires_at`
    pub fn decode(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Decode and validate a token against `now` (Unix timestamp).
    pub fn decode_at(&self, token: &str, now: i64) -> Result<TokenPayload, TokenError> {
        let token_data = decode::<TokenPayload>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(token, e))?;

        let payload = token_data.claims;
        if payload.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(payload)
    }
}

fn classify(token: &str, err: JwtError) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
            TokenError::UnexpectedAlgorithm(declared_algorithm(token).unwrap_or_default())
        }
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => match declared_algorithm(token) {
            // jsonwebtoken cannot parse a header naming an algorithm it does not know ("none")
            Some(alg) if !is_hmac(&alg) => TokenError::UnexpectedAlgorithm(alg),
            _ => TokenError::Malformed(err.to_string()),
        },
    }
}

fn is_hmac(alg: &str) -> bool {
    Algorithm::from_str(alg).map_or(false, |alg| HMAC_ALGORITHMS.contains(&alg))
}

/// Read the `alg` field of the header segment without verifying anything.
fn declared_algorithm(token: &str) -> Option<String> {
    let header = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(header).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&bytes).ok()?;

    header.get("alg")?.as_str().map(str::to_string)
}

use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and validates signed, time-limited bearer tokens.
///
/// The service holds only immutable key material, so one instance is shared
/// by every worker.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    /// Builds a service signing with `secret` under an HMAC `algorithm`.
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl,
        }
    }

    /// Generates a token for `subject` expiring one TTL from now.
    ///
    /// # Returns
    /// The encoded token, or `AppError::InternalServerError` if the expiry
    /// overflows or encoding fails.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?
            .timestamp()
            .max(0) as usize;
        let claims = Claims {
            sub: subject.to_owned(),
            exp: expiration,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature, structure and expiry of `token`.
    ///
    /// Returns `None` for every kind of failure. The reason is only logged, so
    /// callers cannot learn why a token was refused.
    pub fn validate(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                log::debug!("Rejected access token: {}", e);
                None
            }
        }
    }
}

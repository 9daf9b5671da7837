use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::credentials::{password_rules, username_rules};

/// A registered account as stored in the `users` table.
///
/// Not serializable: the password digest must never leave the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /signup` and `POST /token`.
///
/// The credential rules are only checked on signup.
#[derive(Debug, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(custom = "username_rules")]
    pub username: String,
    #[validate(custom = "password_rules")]
    pub password: String,
}

/// Response of `POST /token`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// `{"message": ...}` body used by signup and delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

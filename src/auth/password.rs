use crate::error::AppError;
use bcrypt::{hash, verify};

/// Hashes a password with bcrypt at the given cost. Every call draws a fresh
/// salt, so the same input never yields the same digest twice.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks a password against a stored bcrypt digest.
///
/// A digest that cannot be parsed is an internal error, not a mismatch.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}

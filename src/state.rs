use chrono::Duration;
use sqlx::SqlitePool;

use crate::auth::{hash_password, AuthorizationGate, TokenService};
use crate::config::Config;
use crate::error::AppError;
use crate::store::{TaskStore, UserStore};

/// Everything a handler needs, built once from the config and the pool and
/// shared with every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub gate: AuthorizationGate,
    pub tokens: TokenService,
    pub users: UserStore,
    pub tasks: TaskStore,
    pub bcrypt_cost: u32,
    /// Digest checked on `/token` when the username is unknown, so both
    /// refusals cost one bcrypt verification.
    pub dummy_hash: String,
}

impl AppState {
    /// Fails only if bcrypt cannot hash at the configured cost.
    pub fn new(config: &Config, pool: SqlitePool) -> Result<Self, AppError> {
        let tokens = TokenService::new(
            &config.jwt_secret,
            config.jwt_algorithm,
            Duration::minutes(config.token_ttl_minutes),
        );
        let users = UserStore::new(pool.clone());

        Ok(Self {
            gate: AuthorizationGate::new(tokens.clone(), config.api_key.clone(), users.clone()),
            tokens,
            users,
            tasks: TaskStore::new(pool),
            bcrypt_cost: config.bcrypt_cost,
            dummy_hash: hash_password("unknown-user-placeholder", config.bcrypt_cost)?,
        })
    }
}

use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::store::UserStore;
use std::fmt;

/// Header carrying the shared API key on protected routes.
pub const API_KEY_HEADER: &str = "X-API-Key";

const BEARER_SCHEME: &str = "Bearer";

/// Why a request was refused.
///
/// Only used for logging; every variant except `Lookup` becomes the same
/// `401 Unauthorized` response.
#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    MalformedHeader,
    InvalidToken,
    InvalidApiKey,
    UnknownUser,
    /// The user lookup itself failed; this is a server error, not a refusal.
    Lookup(sqlx::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "authorization or API key header missing"),
            AuthError::MalformedHeader => write!(f, "authorization header is not a bearer token"),
            AuthError::InvalidToken => write!(f, "access token rejected"),
            AuthError::InvalidApiKey => write!(f, "API key mismatch"),
            AuthError::UnknownUser => write!(f, "token subject is not a registered user"),
            AuthError::Lookup(e) => write!(f, "user lookup failed: {}", e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::Lookup(e) => AppError::from(e),
            refused => {
                log::debug!("Unauthorized request: {}", refused);
                AppError::Unauthorized
            }
        }
    }
}

/// Decides whether a request may touch tasks, and on whose behalf.
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. both headers are present;
/// 2. the authorization header reads `Bearer <token>`;
/// 3. the token is valid;
/// 4. the API key matches the configured secret;
/// 5. the token subject names an existing user.
#[derive(Clone)]
pub struct AuthorizationGate {
    tokens: TokenService,
    api_key: String,
    users: UserStore,
}

impl AuthorizationGate {
    pub fn new(tokens: TokenService, api_key: String, users: UserStore) -> Self {
        Self {
            tokens,
            api_key,
            users,
        }
    }

    /// Returns the id of the user the request acts for.
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<i64, AuthError> {
        let (Some(authorization), Some(api_key)) = (authorization, api_key) else {
            return Err(AuthError::MissingHeader);
        };

        let token = bearer_token(authorization).ok_or(AuthError::MalformedHeader)?;
        let claims = self.tokens.validate(token).ok_or(AuthError::InvalidToken)?;

        if api_key != self.api_key {
            return Err(AuthError::InvalidApiKey);
        }

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await
            .map_err(AuthError::Lookup)?
            .ok_or(AuthError::UnknownUser)?;

        Ok(user.id)
    }
}

/// Splits the header on single spaces and takes the second piece when the
/// first is exactly `Bearer`. Anything after the second piece is ignored.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    if parts.next() != Some(BEARER_SCHEME) {
        return None;
    }
    parts.next().filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    const API_KEY: &str = "123456";

    async fn setup() -> (AuthorizationGate, TokenService, i64) {
        let users = UserStore::new(memory_pool().await);
        let alice = users.create("alice", "digest").await.unwrap().id;
        let tokens = TokenService::new("gate-secret", Algorithm::HS256, Duration::minutes(30));
        let gate = AuthorizationGate::new(tokens.clone(), API_KEY.to_string(), users);
        (gate, tokens, alice)
    }

    #[test]
    fn test_bearer_token_split() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer abc def"), Some("abc"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer  abc"), None);
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearerabc"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test_log::test(actix_rt::test)]
    async fn test_authorize_success() {
        let (gate, tokens, alice) = setup().await;
        let header = format!("Bearer {}", tokens.issue("alice").unwrap());

        let user_id = gate.authorize(Some(&header), Some(API_KEY)).await.unwrap();
        assert_eq!(user_id, alice);
    }

    #[test_log::test(actix_rt::test)]
    async fn test_missing_headers() {
        let (gate, tokens, _) = setup().await;
        let header = format!("Bearer {}", tokens.issue("alice").unwrap());

        assert!(matches!(
            gate.authorize(None, Some(API_KEY)).await,
            Err(AuthError::MissingHeader)
        ));
        assert!(matches!(
            gate.authorize(Some(&header), None).await,
            Err(AuthError::MissingHeader)
        ));
    }

    #[test_log::test(actix_rt::test)]
    async fn test_checks_run_in_order() {
        let (gate, tokens, _) = setup().await;

        // A malformed header is reported even when the API key is also wrong.
        assert!(matches!(
            gate.authorize(Some("Token abc"), Some("wrong")).await,
            Err(AuthError::MalformedHeader)
        ));
        // A bad token is reported before the API key is looked at.
        assert!(matches!(
            gate.authorize(Some("Bearer garbage"), Some("wrong")).await,
            Err(AuthError::InvalidToken)
        ));

        let header = format!("Bearer {}", tokens.issue("alice").unwrap());
        assert!(matches!(
            gate.authorize(Some(&header), Some("1234567")).await,
            Err(AuthError::InvalidApiKey)
        ));

        let ghost = format!("Bearer {}", tokens.issue("ghost").unwrap());
        assert!(matches!(
            gate.authorize(Some(&ghost), Some(API_KEY)).await,
            Err(AuthError::UnknownUser)
        ));
    }

    #[test_log::test(actix_rt::test)]
    async fn test_token_from_other_secret_is_refused() {
        let (gate, _, _) = setup().await;
        let foreign = TokenService::new("other-secret", Algorithm::HS256, Duration::minutes(30));
        let header = format!("Bearer {}", foreign.issue("alice").unwrap());

        assert!(matches!(
            gate.authorize(Some(&header), Some(API_KEY)).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_refusals_collapse_to_unauthorized() {
        for error in [
            AuthError::MissingHeader,
            AuthError::MalformedHeader,
            AuthError::InvalidToken,
            AuthError::InvalidApiKey,
            AuthError::UnknownUser,
        ] {
            assert!(matches!(AppError::from(error), AppError::Unauthorized));
        }
        assert!(matches!(
            AppError::from(AuthError::Lookup(sqlx::Error::PoolClosed)),
            AppError::DatabaseError(_)
        ));
    }
}

use jsonwebtoken::Algorithm;
use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Longest token lifetime accepted: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;
/// Costs the bcrypt crate accepts.
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    /// Shared secret used to sign and verify access tokens.
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_ttl_minutes: i64,
    /// The static value every client must send in `X-API-Key`.
    pub api_key: String,
    pub bcrypt_cost: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has invalid value {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://tasks.db?mode=rwc".to_string()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret: required("SECRET_KEY")?,
            jwt_algorithm: parse_algorithm(lookup("ALGORITHM"))?,
            token_ttl_minutes: parse_in(
                &lookup,
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                30,
                1..=MAX_TOKEN_TTL_MINUTES,
            )?,
            api_key: required("API_KEY")?,
            bcrypt_cost: parse_in(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST, BCRYPT_COST_RANGE)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Like `parse_or`, but a parsed value outside `range` is rejected too.
fn parse_in<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + fmt::Display,
{
    let value = parse_or(lookup, key, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

/// Tokens are signed with a shared secret, so only the HMAC family is usable.
fn parse_algorithm(value: Option<String>) -> Result<Algorithm, ConfigError> {
    let Some(value) = value else {
        return Ok(Algorithm::HS256);
    };
    match Algorithm::from_str(value.trim()) {
        Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(algorithm),
        _ => Err(ConfigError::Invalid {
            key: "ALGORITHM",
            value,
        }),
    }
}

//! Configuration module
//!
//! Loads configuration from environment variables once at startup. The
//! resulting [`Config`] is passed explicitly to everything that needs it.

use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

/// Secret used when none is configured outside production.
const DEVELOPMENT_SECRET: &str = "money-track-development-secret";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Secret used to sign bearer tokens
    pub jwt_secret: String,

    /// Signing algorithm for bearer tokens (HMAC family only)
    pub jwt_algorithm: Algorithm,

    /// Bearer token lifetime in minutes
    pub access_token_expire_minutes: i64,

    /// bcrypt work factor
    pub bcrypt_cost: u32,

    /// Allowed CORS origins; empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let is_production = environment == "production";

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port = lookup("DB_PORT").unwrap_or_else(|| "5432".to_string());
                let name = lookup("DB_NAME").unwrap_or_else(|| "moneytrack".to_string());
                let user = lookup("DB_USER").unwrap_or_else(|| "postgres".to_string());
                let pass = lookup("DB_PASS").unwrap_or_default();
                if pass.is_empty() {
                    format!("postgres://{}@{}:{}/{}", user, host, port, name)
                } else {
                    format!("postgres://{}:{}@{}:{}/{}", user, pass, host, port, name)
                }
            }
        };

        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = parse_or(&lookup, "PORT", 3000)?;

        let jwt_secret = match lookup("JWT_SECRET").or_else(|| lookup("SECRET_KEY")) {
            Some(secret) if !secret.is_empty() => secret,
            _ if is_production => return Err(ConfigError::MissingEnv("JWT_SECRET")),
            _ => DEVELOPMENT_SECRET.to_string(),
        };

        let jwt_algorithm = match lookup("JWT_ALGORITHM").or_else(|| lookup("ALGORITHM")) {
            Some(name) => parse_hmac_algorithm(&name)?,
            None => Algorithm::HS256,
        };

        let access_token_expire_minutes = parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 60)?;
        if access_token_expire_minutes <= 0 {
            return Err(ConfigError::InvalidValue("ACCESS_TOKEN_EXPIRE_MINUTES"));
        }

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue("BCRYPT_COST"));
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty() && *origin != "*")
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            jwt_secret,
            jwt_algorithm,
            access_token_expire_minutes,
            bcrypt_cost,
            cors_allowed_origins,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// True when no JWT secret was configured
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_SECRET
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Only shared-secret algorithms make sense with a single configured secret.
fn parse_hmac_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(name.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::InvalidValue("JWT_ALGORITHM")),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

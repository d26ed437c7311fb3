//! Shared application state
//!
//! Constructed once at startup and cloned into every request.

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::TokenService;
use crate::config::Config;

#[derive(Debug, Clone, FromRef)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: Arc<TokenService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            pool,
            tokens: Arc::new(TokenService::from_config(&config)),
            config: Arc::new(config),
        }
    }
}

//! Login Handler
//!
//! Exchanges email and password for a bearer token.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{verify_in_background, TokenService};
use crate::domain::{Email, OperationContext};
use crate::error::AppError;
use crate::repository::accounts;

use super::{LoginCommand, LoginResult};

/// Handler for login
pub struct LoginHandler {
    pool: PgPool,
    tokens: Arc<TokenService>,
}

impl LoginHandler {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    /// Execute the login command
    ///
    /// Unknown emails fail with `AccountNotFound`, wrong passwords with
    /// `InvalidPassword`.
    pub async fn execute(
        &self,
        command: LoginCommand,
        context: &OperationContext,
    ) -> Result<LoginResult, AppError> {
        // A malformed address cannot belong to any account
        let email = Email::parse(&command.email)
            .map_err(|_| AppError::AccountNotFound(command.email.clone()))?;

        let account = {
            let mut conn = self.pool.acquire().await?;
            accounts::find_by_email(&mut conn, &email).await?
        }
        .ok_or_else(|| AppError::AccountNotFound(email.to_string()))?;

        if !verify_in_background(account.password_hash(), command.password).await? {
            tracing::warn!(
                account_id = account.id,
                correlation_id = ?context.correlation_id,
                "Login rejected: wrong password"
            );
            return Err(AppError::InvalidPassword);
        }

        let issued = self.tokens.issue(account.id)?;

        tracing::info!(
            account_id = account.id,
            expires_at = %issued.expires_at,
            correlation_id = ?context.correlation_id,
            "Login succeeded"
        );

        Ok(LoginResult {
            access_token: issued.token,
            token_type: "bearer",
        })
    }
}

//! Account Handlers
//!
//! Registration, profile updates and account deletion.

use sqlx::PgPool;

use crate::auth::{hash_in_background, PasswordHash};
use crate::db;
use crate::domain::{Email, OperationContext};
use crate::error::AppError;
use crate::repository::accounts::{self, EMAIL_UNIQUE_CONSTRAINT};
use crate::repository::{Account, AccountChanges, NewAccount};

use super::{required_text, RegisterCommand, UpdateAccountCommand, MAX_NAME_CHARS};

/// A lost race on the email constraint is the same condition as a duplicate
/// found by lookup.
fn email_conflict(err: sqlx::Error) -> AppError {
    if db::is_unique_violation(&err, EMAIL_UNIQUE_CONSTRAINT) {
        AppError::EmailAlreadyRegistered
    } else {
        AppError::Database(err)
    }
}

// =========================================================================
// RegisterHandler
// =========================================================================

/// Handler for account registration
pub struct RegisterHandler {
    pool: PgPool,
    bcrypt_cost: u32,
}

impl RegisterHandler {
    pub fn new(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Execute the register command
    pub async fn execute(
        &self,
        command: RegisterCommand,
        context: &OperationContext,
    ) -> Result<Account, AppError> {
        let name = required_text("name", command.name, MAX_NAME_CHARS)?;
        let email = Email::parse(&command.email)?;
        PasswordHash::validate(&command.password)?;

        {
            let mut conn = self.pool.acquire().await?;
            if accounts::email_taken(&mut conn, &email).await? {
                return Err(AppError::EmailAlreadyRegistered);
            }
        }

        let password_hash = hash_in_background(command.password, self.bcrypt_cost).await?;

        let mut conn = self.pool.acquire().await?;
        let account = accounts::insert(
            &mut conn,
            NewAccount {
                name,
                email,
                password_hash,
                monthly_income: command.monthly_income,
            },
        )
        .await
        .map_err(email_conflict)?;

        tracing::info!(
            account_id = account.id,
            correlation_id = ?context.correlation_id,
            "Account registered"
        );

        Ok(account)
    }
}

// =========================================================================
// UpdateAccountHandler
// =========================================================================

/// Handler for partial profile updates
pub struct UpdateAccountHandler {
    pool: PgPool,
    bcrypt_cost: u32,
}

impl UpdateAccountHandler {
    pub fn new(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Execute the update command
    pub async fn execute(
        &self,
        command: UpdateAccountCommand,
        context: &OperationContext,
    ) -> Result<Account, AppError> {
        let account_id = command.account_id;

        let name = command
            .name
            .map(|name| required_text("name", name, MAX_NAME_CHARS))
            .transpose()?;
        let email = command.email.as_deref().map(Email::parse).transpose()?;
        let password_hash = match command.password {
            Some(password) => Some(hash_in_background(password, self.bcrypt_cost).await?),
            None => None,
        };

        let changes = AccountChanges {
            name,
            email,
            password_hash,
            monthly_income: command.monthly_income,
        };

        let mut conn = self.pool.acquire().await?;
        let account = if changes.is_empty() {
            accounts::find_by_id(&mut conn, account_id).await?
        } else {
            accounts::update(&mut conn, account_id, &changes)
                .await
                .map_err(email_conflict)?
        };
        let account = account.ok_or_else(|| AppError::AccountNotFound(account_id.to_string()))?;

        tracing::info!(
            account_id,
            correlation_id = ?context.correlation_id,
            "Account updated"
        );

        Ok(account)
    }
}

// =========================================================================
// DeleteAccountHandler
// =========================================================================

/// Handler for hard-deleting an account
pub struct DeleteAccountHandler {
    pool: PgPool,
}

impl DeleteAccountHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete the account; its transactions are removed by the store.
    pub async fn execute(
        &self,
        account_id: i64,
        context: &OperationContext,
    ) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        if !accounts::delete(&mut conn, account_id).await? {
            return Err(AppError::AccountNotFound(account_id.to_string()));
        }

        tracing::info!(
            account_id,
            correlation_id = ?context.correlation_id,
            "Account deleted"
        );

        Ok(())
    }
}

//! Transaction Handlers
//!
//! Create, update and delete transactions. The owner is always the
//! authenticated caller; handlers never accept an owner from the client.

use chrono::Utc;
use sqlx::PgPool;

use crate::domain::OperationContext;
use crate::error::AppError;
use crate::repository::{accounts, transactions, NewTransaction, Transaction, TransactionChanges};

use super::{
    optional_text, required_text, CreateTransactionCommand, UpdateTransactionCommand,
    MAX_CATEGORY_CHARS, MAX_DESCRIPTION_CHARS, MAX_KIND_CHARS,
};

// =========================================================================
// CreateTransactionHandler
// =========================================================================

/// Handler for recording a transaction
pub struct CreateTransactionHandler {
    pool: PgPool,
}

impl CreateTransactionHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the create command
    pub async fn execute(
        &self,
        command: CreateTransactionCommand,
        context: &OperationContext,
    ) -> Result<Transaction, AppError> {
        let description =
            required_text("description", command.description, MAX_DESCRIPTION_CHARS)?;
        let kind = required_text("type", command.kind, MAX_KIND_CHARS)?;
        let category = command
            .category
            .map(|c| optional_text("category", c, MAX_CATEGORY_CHARS))
            .transpose()?
            .flatten();
        let date = command.date.unwrap_or_else(|| Utc::now().naive_utc());

        // Owner check and insert share one database transaction
        let mut tx = self.pool.begin().await?;

        if !accounts::exists(&mut *tx, command.account_id).await? {
            return Err(AppError::AccountNotFound(command.account_id.to_string()));
        }

        let transaction = transactions::insert(
            &mut *tx,
            NewTransaction {
                account_id: command.account_id,
                description,
                amount: command.amount,
                kind,
                category,
                date,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = transaction.id,
            account_id = transaction.account_id,
            amount = %transaction.amount,
            kind = %transaction.kind,
            correlation_id = ?context.correlation_id,
            "Transaction created"
        );

        Ok(transaction)
    }
}

// =========================================================================
// UpdateTransactionHandler
// =========================================================================

/// Handler for partial transaction updates
pub struct UpdateTransactionHandler {
    pool: PgPool,
}

impl UpdateTransactionHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the update command
    pub async fn execute(
        &self,
        command: UpdateTransactionCommand,
        context: &OperationContext,
    ) -> Result<Transaction, AppError> {
        let changes = TransactionChanges {
            description: command
                .description
                .map(|d| required_text("description", d, MAX_DESCRIPTION_CHARS))
                .transpose()?,
            amount: command.amount,
            kind: command
                .kind
                .map(|k| required_text("type", k, MAX_KIND_CHARS))
                .transpose()?,
            category: match command.category {
                Some(Some(c)) => Some(optional_text("category", c, MAX_CATEGORY_CHARS)?),
                Some(None) => Some(None),
                None => None,
            },
            date: command.date,
        };

        let mut conn = self.pool.acquire().await?;
        let transaction = transactions::update_owned(
            &mut conn,
            command.transaction_id,
            command.account_id,
            &changes,
        )
        .await?
        .ok_or_else(|| AppError::TransactionNotFound(command.transaction_id.to_string()))?;

        tracing::info!(
            transaction_id = transaction.id,
            account_id = transaction.account_id,
            correlation_id = ?context.correlation_id,
            "Transaction updated"
        );

        Ok(transaction)
    }
}

// =========================================================================
// DeleteTransactionHandler
// =========================================================================

/// Handler for deleting a transaction
pub struct DeleteTransactionHandler {
    pool: PgPool,
}

impl DeleteTransactionHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete `transaction_id` if `account_id` owns it.
    pub async fn execute(
        &self,
        transaction_id: i64,
        account_id: i64,
        context: &OperationContext,
    ) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        if !transactions::delete_owned(&mut conn, transaction_id, account_id).await? {
            return Err(AppError::TransactionNotFound(transaction_id.to_string()));
        }

        tracing::info!(
            transaction_id,
            account_id,
            correlation_id = ?context.correlation_id,
            "Transaction deleted"
        );

        Ok(())
    }
}

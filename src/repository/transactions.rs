//! Transaction repository
//!
//! Every query other than `insert` is scoped to an owning account, so one
//! account can never read or modify another's records through this module.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};

use crate::domain::TransactionFilter;

/// A stored transaction
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub description: String,
    pub amount: Decimal,
    /// Free-text type tag, conventionally `income` or `expense`
    pub kind: String,
    pub category: Option<String>,
    pub date: NaiveDateTime,
    pub created_at: DateTime<Utc>,
}

/// Values for a new transaction row
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub kind: String,
    pub category: Option<String>,
    pub date: NaiveDateTime,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<String>,
    /// `Some(None)` clears the category
    pub category: Option<Option<String>>,
    pub date: Option<NaiveDateTime>,
}

const TRANSACTION_COLUMNS: &str =
    "id, account_id, description, amount, kind, category, date, created_at";

pub async fn insert(
    conn: &mut PgConnection,
    transaction: NewTransaction,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        r#"
        INSERT INTO transactions (account_id, description, amount, kind, category, date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {TRANSACTION_COLUMNS}
        "#
    ))
    .bind(transaction.account_id)
    .bind(&transaction.description)
    .bind(transaction.amount)
    .bind(&transaction.kind)
    .bind(&transaction.category)
    .bind(transaction.date)
    .fetch_one(conn)
    .await
}

pub async fn find_owned(
    conn: &mut PgConnection,
    id: i64,
    account_id: i64,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 AND account_id = $2"
    ))
    .bind(id)
    .bind(account_id)
    .fetch_optional(conn)
    .await
}

/// List an account's transactions, newest first.
pub async fn list_for_account(
    conn: &mut PgConnection,
    account_id: i64,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        r#"
        SELECT {TRANSACTION_COLUMNS}
        FROM transactions
        WHERE account_id = $1
          AND ($2::text IS NULL OR LOWER(kind) = LOWER($2))
          AND ($3::text IS NULL OR category = $3)
          AND ($4::timestamp IS NULL OR date >= $4)
          AND ($5::timestamp IS NULL OR date <= $5)
        ORDER BY date DESC, id DESC
        "#
    ))
    .bind(account_id)
    .bind(filter.kind.as_deref())
    .bind(filter.category.as_deref())
    .bind(filter.start)
    .bind(filter.end)
    .fetch_all(conn)
    .await
}

/// Amount and type tag of every transaction the account owns.
pub async fn amounts_for_account(
    conn: &mut PgConnection,
    account_id: i64,
) -> Result<Vec<(Decimal, String)>, sqlx::Error> {
    sqlx::query_as("SELECT amount, kind FROM transactions WHERE account_id = $1")
        .bind(account_id)
        .fetch_all(conn)
        .await
}

/// Apply `changes` to an owned transaction, returning `None` when the
/// account owns no transaction with that id.
pub async fn update_owned(
    conn: &mut PgConnection,
    id: i64,
    account_id: i64,
    changes: &TransactionChanges,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        r#"
        UPDATE transactions SET
            description = COALESCE($3, description),
            amount = COALESCE($4, amount),
            kind = COALESCE($5, kind),
            date = COALESCE($6, date),
            category = CASE WHEN $7 THEN $8 ELSE category END
        WHERE id = $1 AND account_id = $2
        RETURNING {TRANSACTION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(account_id)
    .bind(changes.description.as_deref())
    .bind(changes.amount)
    .bind(changes.kind.as_deref())
    .bind(changes.date)
    .bind(changes.category.is_some())
    .bind(changes.category.clone().flatten())
    .fetch_optional(conn)
    .await
}

pub async fn delete_owned(
    conn: &mut PgConnection,
    id: i64,
    account_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND account_id = $2")
        .bind(id)
        .bind(account_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

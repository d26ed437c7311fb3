//! Account repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};

use crate::auth::PasswordHash;
use crate::domain::Email;

/// Name of the unique constraint on `accounts.email`.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "accounts_email_key";

/// A stored account
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    password_hash: String,
    pub monthly_income: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn password_hash(&self) -> PasswordHash {
        PasswordHash::from_stored(self.password_hash.as_str())
    }
}

/// Values for a new account row
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub monthly_income: Option<Decimal>,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password_hash: Option<PasswordHash>,
    /// `Some(None)` clears the monthly income
    pub monthly_income: Option<Option<Decimal>>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.monthly_income.is_none()
    }
}

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, monthly_income, created_at";

pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_email(
    conn: &mut PgConnection,
    email: &Email,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
    ))
    .bind(email.as_str())
    .fetch_optional(conn)
    .await
}

pub async fn exists(conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await
}

pub async fn email_taken(conn: &mut PgConnection, email: &Email) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)")
        .bind(email.as_str())
        .fetch_one(conn)
        .await
}

pub async fn list(conn: &mut PgConnection) -> Result<Vec<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"))
        .fetch_all(conn)
        .await
}

pub async fn insert(conn: &mut PgConnection, account: NewAccount) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        r#"
        INSERT INTO accounts (name, email, password_hash, monthly_income)
        VALUES ($1, $2, $3, $4)
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(&account.name)
    .bind(account.email.as_str())
    .bind(account.password_hash.as_str())
    .bind(account.monthly_income)
    .fetch_one(conn)
    .await
}

/// Apply `changes` and return the updated row, or `None` if no such account.
pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    changes: &AccountChanges,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        r#"
        UPDATE accounts SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            password_hash = COALESCE($4, password_hash),
            monthly_income = CASE WHEN $5 THEN $6 ELSE monthly_income END
        WHERE id = $1
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(changes.name.as_deref())
    .bind(changes.email.as_ref().map(Email::as_str))
    .bind(changes.password_hash.as_ref().map(PasswordHash::as_str))
    .bind(changes.monthly_income.is_some())
    .bind(changes.monthly_income.flatten())
    .fetch_optional(conn)
    .await
}

/// Hard delete. Owned transactions go with it via `ON DELETE CASCADE`.
pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

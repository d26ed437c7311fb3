//! API Routes
//!
//! HTTP endpoint definitions. Write operations go through command handlers;
//! read-only queries call the repository directly.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;

use crate::auth::CurrentAccount;
use crate::domain::{parse_timestamp, OperationContext, Summary, TransactionFilter};
use crate::error::AppError;
use crate::handlers::{
    CreateTransactionCommand, CreateTransactionHandler, DeleteAccountHandler,
    DeleteTransactionHandler, LoginCommand, LoginHandler, RegisterCommand, RegisterHandler,
    UpdateAccountCommand, UpdateAccountHandler, UpdateTransactionCommand,
    UpdateTransactionHandler,
};
use crate::repository::{accounts, transactions, Account, Transaction};
use crate::state::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

/// Body of `POST /auth/register` and `POST /users/`
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub monthly_income: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Absent fields are left unchanged; `monthly_income: null` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub monthly_income: Option<Option<Decimal>>,
}

/// Body of `POST /transactions/`. Any `user_id` sent by the client is
/// ignored; the owner is always the caller.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Absent fields are left unchanged; `category: null` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category: Option<Option<String>>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ListQuery {
    fn to_filter(&self) -> Result<TransactionFilter, AppError> {
        Ok(TransactionFilter::parse(
            self.kind.as_deref(),
            self.category.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )?)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub monthly_income: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for UserResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            monthly_income: account.monthly_income,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: Option<String>,
    pub date: NaiveDateTime,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            user_id: transaction.account_id,
            description: transaction.description,
            amount: transaction.amount,
            kind: transaction.kind,
            category: transaction.category,
            date: transaction.date,
            created_at: transaction.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub user_id: i64,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn parse_date(raw: Option<String>) -> Result<Option<NaiveDateTime>, AppError> {
    Ok(raw
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_timestamp)
        .transpose()?)
}

fn to_responses(rows: Vec<Transaction>) -> Json<Vec<TransactionResponse>> {
    Json(rows.into_iter().map(TransactionResponse::from).collect())
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
///
/// Collection paths are served with and without a trailing slash.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // Authentication
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        // Users
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/profile", get(profile))
        .route("/users/:user_id", put(update_user).delete(delete_user))
        // Transactions
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/", get(list_transactions).post(create_transaction))
        .route("/transactions/history", get(history))
        .route("/transactions/by_category/:category", get(list_by_category))
        .route("/transactions/summary", get(own_summary))
        .route("/transactions/summary/:user_id", get(summary_for_user))
        .route("/transactions/user/:user_id", get(list_for_user))
        .route(
            "/transactions/:transaction_id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

// =========================================================================
// GET / and GET /health
// =========================================================================

async fn root() -> Json<MessageResponse> {
    MessageResponse::new("MoneyTrack API is running")
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// =========================================================================
// POST /auth/register
// =========================================================================

/// Register a new account. No token is issued; clients log in separately.
async fn register(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let handler = RegisterHandler::new(state.pool, state.config.bcrypt_cost);
    handler.execute(register_command(request), &context).await?;

    Ok(MessageResponse::new("User registered successfully"))
}

fn register_command(request: CreateAccountRequest) -> RegisterCommand {
    let command = RegisterCommand::new(request.name, request.email, request.password);
    match request.monthly_income {
        Some(income) => command.with_monthly_income(income),
        None => command,
    }
}

// =========================================================================
// POST /auth/login
// =========================================================================

async fn login(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let handler = LoginHandler::new(state.pool, state.tokens);
    let result = handler
        .execute(LoginCommand::new(request.email, request.password), &context)
        .await?;

    Ok(Json(TokenResponse {
        access_token: result.access_token,
        token_type: result.token_type.to_string(),
    }))
}

// =========================================================================
// /users
// =========================================================================

/// Create an account and return it
async fn create_user(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let handler = RegisterHandler::new(state.pool, state.config.bcrypt_cost);
    let account = handler.execute(register_command(request), &context).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

async fn list_users(State(pool): State<PgPool>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let mut conn = pool.acquire().await?;
    let accounts = accounts::list(&mut conn).await?;

    Ok(Json(accounts.into_iter().map(UserResponse::from).collect()))
}

async fn profile(CurrentAccount(account): CurrentAccount) -> Json<UserResponse> {
    Json(account.into())
}

async fn update_user(
    State(state): State<AppState>,
    current: CurrentAccount,
    Extension(context): Extension<OperationContext>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    current.ensure_owner(user_id)?;

    let handler = UpdateAccountHandler::new(state.pool, state.config.bcrypt_cost);
    let command = UpdateAccountCommand {
        name: request.name,
        email: request.email,
        password: request.password,
        monthly_income: request.monthly_income,
        ..UpdateAccountCommand::new(user_id)
    };
    let account = handler.execute(command, &context).await?;

    Ok(Json(account.into()))
}

async fn delete_user(
    State(pool): State<PgPool>,
    current: CurrentAccount,
    Extension(context): Extension<OperationContext>,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    current.ensure_owner(user_id)?;

    DeleteAccountHandler::new(pool)
        .execute(user_id, &context)
        .await?;

    Ok(MessageResponse::new("User deleted successfully"))
}

// =========================================================================
// /transactions
// =========================================================================

async fn create_transaction(
    State(pool): State<PgPool>,
    current: CurrentAccount,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let mut command = CreateTransactionCommand::new(
        current.id(),
        request.description,
        request.amount,
        request.kind,
    );
    if let Some(category) = request.category {
        command = command.with_category(category);
    }
    if let Some(date) = parse_date(request.date)? {
        command = command.with_date(date);
    }

    let transaction = CreateTransactionHandler::new(pool)
        .execute(command, &context)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// List the caller's transactions, newest first, with optional filters
async fn list_transactions(
    State(pool): State<PgPool>,
    current: CurrentAccount,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let filter = query.to_filter()?;

    let mut conn = pool.acquire().await?;
    let rows = transactions::list_for_account(&mut conn, current.id(), &filter).await?;

    Ok(to_responses(rows))
}

/// Full history; unlike the plain listing, an empty history is a 404
async fn history(
    State(pool): State<PgPool>,
    current: CurrentAccount,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let mut conn = pool.acquire().await?;
    let rows =
        transactions::list_for_account(&mut conn, current.id(), &TransactionFilter::default())
            .await?;

    if rows.is_empty() {
        return Err(AppError::NoTransactions);
    }
    Ok(to_responses(rows))
}

async fn list_by_category(
    State(pool): State<PgPool>,
    current: CurrentAccount,
    Path(category): Path<String>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let filter = TransactionFilter::by_category(category);

    let mut conn = pool.acquire().await?;
    let rows = transactions::list_for_account(&mut conn, current.id(), &filter).await?;

    if rows.is_empty() {
        return Err(AppError::NoTransactions);
    }
    Ok(to_responses(rows))
}

async fn own_summary(
    State(pool): State<PgPool>,
    current: CurrentAccount,
) -> Result<Json<SummaryResponse>, AppError> {
    summarize(&pool, current.id()).await.map(Json)
}

async fn summary_for_user(
    State(pool): State<PgPool>,
    current: CurrentAccount,
    Path(user_id): Path<i64>,
) -> Result<Json<SummaryResponse>, AppError> {
    current.ensure_owner(user_id)?;
    summarize(&pool, user_id).await.map(Json)
}

async fn summarize(pool: &PgPool, account_id: i64) -> Result<SummaryResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let rows = transactions::amounts_for_account(&mut conn, account_id).await?;

    let summary = Summary::from_entries(rows.iter().map(|(amount, kind)| (*amount, kind.as_str())))?
        .ok_or(AppError::NoTransactions)?;

    Ok(SummaryResponse {
        user_id: account_id,
        total_income: summary.total_income,
        total_expenses: summary.total_expenses,
        balance: summary.balance,
    })
}

async fn list_for_user(
    State(pool): State<PgPool>,
    current: CurrentAccount,
    Path(user_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    current.ensure_owner(user_id)?;
    let filter = query.to_filter()?;

    let mut conn = pool.acquire().await?;
    if !accounts::exists(&mut conn, user_id).await? {
        return Err(AppError::AccountNotFound(user_id.to_string()));
    }
    let rows = transactions::list_for_account(&mut conn, user_id, &filter).await?;

    Ok(to_responses(rows))
}

/// Another account's transaction is indistinguishable from a missing one
async fn get_transaction(
    State(pool): State<PgPool>,
    current: CurrentAccount,
    Path(transaction_id): Path<i64>,
) -> Result<Json<TransactionResponse>, AppError> {
    let mut conn = pool.acquire().await?;
    let transaction = transactions::find_owned(&mut conn, transaction_id, current.id())
        .await?
        .ok_or_else(|| AppError::TransactionNotFound(transaction_id.to_string()))?;

    Ok(Json(transaction.into()))
}

async fn update_transaction(
    State(pool): State<PgPool>,
    current: CurrentAccount,
    Extension(context): Extension<OperationContext>,
    Path(transaction_id): Path<i64>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    let command = UpdateTransactionCommand {
        description: request.description,
        amount: request.amount,
        kind: request.kind,
        category: request.category,
        date: parse_date(request.date)?,
        ..UpdateTransactionCommand::new(transaction_id, current.id())
    };

    let transaction = UpdateTransactionHandler::new(pool)
        .execute(command, &context)
        .await?;

    Ok(Json(transaction.into()))
}

async fn delete_transaction(
    State(pool): State<PgPool>,
    current: CurrentAccount,
    Extension(context): Extension<OperationContext>,
    Path(transaction_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    DeleteTransactionHandler::new(pool)
        .execute(transaction_id, current.id(), &context)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

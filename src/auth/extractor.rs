//! Authenticated identity resolution
//!
//! `CurrentAccount` is the gate in front of every protected endpoint: it reads
//! the `Authorization: Bearer` header, verifies the token and loads the
//! account it names. Any failure rejects the request with 401.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::AppError;
use crate::repository::{accounts, Account};
use crate::state::AppState;

/// The account that presented a valid bearer token.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl CurrentAccount {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    /// Reject with 403 unless `account_id` is the caller's own.
    pub fn ensure_owner(&self, account_id: i64) -> Result<(), AppError> {
        if self.id() == account_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "accounts may only access their own resources".to_string(),
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthorized)?;

        let state = AppState::from_ref(state);
        let account_id = state.tokens.verify(bearer.token())?;

        let mut conn = state.pool.acquire().await?;
        let account = accounts::find_by_id(&mut conn, account_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(account_id, "Bearer token names a deleted account");
                AppError::Unauthorized
            })?;

        Ok(CurrentAccount(account))
    }
}

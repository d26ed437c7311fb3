//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::{PasswordError, TokenError};
use crate::domain::DomainError;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Incorrect password")]
    InvalidPassword,

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("No transactions found")]
    NoTransactions,

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Invalid(domain_err) => AppError::Domain(domain_err),
            PasswordError::Hashing(e) => AppError::Internal(format!("password hashing: {e}")),
            PasswordError::Task(e) => AppError::Internal(format!("password hashing: {e}")),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encoding(e) => AppError::Internal(format!("token creation: {e}")),
            TokenError::Expired | TokenError::Invalid(_) | TokenError::InvalidSubject => {
                tracing::debug!(error = %err, "Rejected bearer token");
                AppError::Unauthorized
            }
        }
    }
}

/// Error response body
///
/// `detail` repeats `error` for clients that read that key.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::EmailAlreadyRegistered => {
                (StatusCode::BAD_REQUEST, "email_already_registered", None)
            }
            AppError::InvalidPassword => (StatusCode::BAD_REQUEST, "invalid_password", None),
            AppError::Domain(domain_err) => {
                (StatusCode::BAD_REQUEST, domain_err.code(), None)
            }

            // 401 Unauthorized
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),

            // 403 Forbidden
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),

            // 404 Not Found
            AppError::AccountNotFound(id) => {
                (StatusCode::NOT_FOUND, "account_not_found", Some(id.clone()))
            }
            AppError::TransactionNotFound(id) => {
                (StatusCode::NOT_FOUND, "transaction_not_found", Some(id.clone()))
            }
            AppError::NoTransactions => (StatusCode::NOT_FOUND, "no_transactions", None),

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        // Server-side failures are logged above, not echoed to clients
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            detail: error.clone(),
            error,
            error_code: error_code.to_string(),
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_client_error_statuses() {
        assert_eq!(status_of(AppError::EmailAlreadyRegistered), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::InvalidPassword), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::Domain(DomainError::InvertedDateRange)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::Forbidden("x".into())), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AppError::AccountNotFound("1".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::TransactionNotFound("1".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(AppError::NoTransactions), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let response = AppError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn test_server_errors() {
        assert_eq!(
            status_of(AppError::Database(sqlx::Error::PoolTimedOut)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_token_errors_become_unauthorized() {
        assert!(matches!(AppError::from(TokenError::Expired), AppError::Unauthorized));
        assert!(matches!(AppError::from(TokenError::InvalidSubject), AppError::Unauthorized));
    }

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = axum::body::to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_body_carries_detail_alongside_error() {
        let body = body_of(AppError::EmailAlreadyRegistered).await;

        assert_eq!(body["error_code"], "email_already_registered");
        assert_eq!(body["detail"], body["error"]);
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_server_error_detail_is_generic() {
        let body = body_of(AppError::Internal("secret stack trace".into())).await;
        assert_eq!(body["detail"], "Internal server error");
    }

    #[tokio::test]
    async fn test_out_of_range_totals_are_bad_request() {
        let out_of_range = || AppError::Domain(DomainError::AmountOutOfRange);
        assert_eq!(status_of(out_of_range()), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(out_of_range()).await["error_code"], "amount_out_of_range");
    }

    #[test]
    fn test_password_validation_error_is_client_error() {
        let err = AppError::from(PasswordError::Invalid(DomainError::EmptyField("password")));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }
}

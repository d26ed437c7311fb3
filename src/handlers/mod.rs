//! Command Handlers module
//!
//! Command handlers that validate input and orchestrate repository calls.
//! Read-only queries live next to their routes.

mod account_handler;
mod commands;
mod login_handler;
mod transaction_handler;

#[cfg(test)]
mod tests;

pub use account_handler::{DeleteAccountHandler, RegisterHandler, UpdateAccountHandler};
pub use commands::*;
pub use login_handler::LoginHandler;
pub use transaction_handler::{
    CreateTransactionHandler, DeleteTransactionHandler, UpdateTransactionHandler,
};

use crate::domain::DomainError;

// Column widths in the initial migration, counted in characters
pub(crate) const MAX_NAME_CHARS: usize = 255;
pub(crate) const MAX_DESCRIPTION_CHARS: usize = 255;
pub(crate) const MAX_KIND_CHARS: usize = 50;
pub(crate) const MAX_CATEGORY_CHARS: usize = 50;

/// Trim a required text field, rejecting blank or over-long values.
pub(crate) fn required_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    check_length(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank becomes `None`.
pub(crate) fn optional_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<Option<String>, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    check_length(field, trimmed, max)?;
    Ok(Some(trimmed.to_string()))
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::FieldTooLong { field, max });
    }
    Ok(())
}

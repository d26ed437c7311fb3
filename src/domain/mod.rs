//! Domain module
//!
//! Core domain types and business rules, free of HTTP and database concerns.

pub mod context;
pub mod email;
pub mod error;
pub mod filter;
pub mod summary;
pub mod transaction;

pub use context::OperationContext;
pub use email::Email;
pub use error::DomainError;
pub use filter::{parse_timestamp, TransactionFilter};
pub use summary::Summary;
pub use transaction::TransactionKind;

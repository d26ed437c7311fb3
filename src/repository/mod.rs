//! Repository module
//!
//! Data access for the `accounts` and `transactions` tables. Functions take an
//! explicit connection so callers decide its scope: a pooled connection for
//! a single statement, or a database transaction spanning several.

pub mod accounts;
pub mod transactions;

pub use accounts::{Account, AccountChanges, NewAccount};
pub use transactions::{NewTransaction, Transaction, TransactionChanges};

//! Command definitions
//!
//! Commands represent intentions to change the system state. Inputs are
//! still raw here; handlers validate them.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Command to register a new account
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    pub monthly_income: Option<Decimal>,
}

impl RegisterCommand {
    pub fn new(name: String, email: String, password: String) -> Self {
        Self {
            name,
            email,
            password,
            monthly_income: None,
        }
    }

    pub fn with_monthly_income(mut self, monthly_income: Decimal) -> Self {
        self.monthly_income = Some(monthly_income);
        self
    }
}

/// Command to exchange credentials for a bearer token
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

/// Command to partially update an account's profile
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountCommand {
    pub account_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `Some(None)` clears the monthly income
    pub monthly_income: Option<Option<Decimal>>,
}

impl UpdateAccountCommand {
    pub fn new(account_id: i64) -> Self {
        Self {
            account_id,
            ..Self::default()
        }
    }
}

/// Command to record a transaction for an account
#[derive(Debug, Clone)]
pub struct CreateTransactionCommand {
    pub account_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub kind: String,
    pub category: Option<String>,
    /// Defaults to the current UTC time
    pub date: Option<NaiveDateTime>,
}

impl CreateTransactionCommand {
    pub fn new(account_id: i64, description: String, amount: Decimal, kind: String) -> Self {
        Self {
            account_id,
            description,
            amount,
            kind,
            category: None,
            date: None,
        }
    }

    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }
}

/// Command to partially update one of an account's transactions
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionCommand {
    pub transaction_id: i64,
    pub account_id: i64,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<String>,
    /// `Some(None)` clears the category
    pub category: Option<Option<String>>,
    pub date: Option<NaiveDateTime>,
}

impl UpdateTransactionCommand {
    pub fn new(transaction_id: i64, account_id: i64) -> Self {
        Self {
            transaction_id,
            account_id,
            ..Self::default()
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub access_token: String,
    pub token_type: &'static str,
}

//! Summary aggregation
//!
//! Income, expense and balance totals over an account's transactions.

use rust_decimal::Decimal;

use super::{DomainError, TransactionKind};

/// Aggregated totals for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

impl Summary {
    /// Sum `(amount, type tag)` pairs in a single pass.
    ///
    /// Returns `Ok(None)` when there is nothing to summarize, and
    /// [`DomainError::AmountOutOfRange`] when a total overflows `Decimal`.
    pub fn from_entries<'a, I>(entries: I) -> Result<Option<Self>, DomainError>
    where
        I: IntoIterator<Item = (Decimal, &'a str)>,
    {
        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut seen = false;

        for (amount, tag) in entries {
            seen = true;
            let total = match TransactionKind::classify(tag) {
                TransactionKind::Income => &mut total_income,
                TransactionKind::Expense => &mut total_expenses,
                TransactionKind::Other => continue,
            };
            *total = total
                .checked_add(amount)
                .ok_or(DomainError::AmountOutOfRange)?;
        }

        if !seen {
            return Ok(None);
        }

        let balance = total_income
            .checked_sub(total_expenses)
            .ok_or(DomainError::AmountOutOfRange)?;

        Ok(Some(Self {
            total_income,
            total_expenses,
            balance,
        }))
    }
}

//! Transaction kind
//!
//! The type tag on a transaction is stored as free text. This module decides
//! how that text counts towards income and expense totals.

/// Classification of a transaction's free-text type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
    /// Any other tag; counted in neither total
    Other,
}

impl TransactionKind {
    /// Classify a type tag, ignoring ASCII case and surrounding whitespace.
    pub fn classify(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("income") {
            Self::Income
        } else if tag.eq_ignore_ascii_case("expense") {
            Self::Expense
        } else {
            Self::Other
        }
    }
}

//! Email type
//!
//! A syntactically valid, normalized email address.

use std::fmt;

use email_address::EmailAddress;

use super::DomainError;

/// Longest address the `accounts.email` column holds.
pub const MAX_EMAIL_CHARS: usize = 255;

/// Email address, trimmed and lower-cased at construction.
///
/// Storage and login lookups only ever see the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Parse and normalize an email address.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if !EmailAddress::is_valid(&normalized) {
            return Err(DomainError::InvalidEmail(raw.to_string()));
        }
        if normalized.chars().count() > MAX_EMAIL_CHARS {
            return Err(DomainError::FieldTooLong {
                field: "email",
                max: MAX_EMAIL_CHARS,
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let email = Email::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
        assert_eq!(email.to_string(), "alice@example.com");
    }

    #[test]
    fn test_rejects_invalid() {
        for raw in ["", "not-an-email", "a@", "@example.com"] {
            assert!(
                matches!(Email::parse(raw), Err(DomainError::InvalidEmail(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_address_longer_than_column() {
        // 64-char local part plus a long multi-label domain
        let domain = format!("{}.{}.{}.com", "b".repeat(63), "c".repeat(63), "d".repeat(63));
        let raw = format!("{}@{}", "a".repeat(64), domain);
        assert!(raw.len() > MAX_EMAIL_CHARS);

        assert!(matches!(
            Email::parse(&raw),
            Err(DomainError::InvalidEmail(_)) | Err(DomainError::FieldTooLong { field: "email", .. })
        ));
    }
}

//! Authentication module
//!
//! Password hashing, bearer token issuance and the extractor that resolves
//! a bearer token to a stored account.

pub mod extractor;
pub mod password;
pub mod token;

pub use extractor::CurrentAccount;
pub use password::{
    hash_in_background, verify_in_background, PasswordError, PasswordHash, MAX_PASSWORD_BYTES,
};
pub use token::{Claims, IssuedToken, TokenError, TokenService};

//! MoneyTrack Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod repository;
pub mod state;

mod error;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;

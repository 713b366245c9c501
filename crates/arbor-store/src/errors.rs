//! Error types for the persistence layer.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// Requested user was not found.
    #[error("user not found: {0}")]
    UserNotFound(i64),

    /// Requested withdraw record was not found.
    #[error("withdraw not found: {0}")]
    WithdrawNotFound(i64),

    /// A balance debit would overdraw the account.
    #[error("insufficient balance for user {user_id}")]
    InsufficientBalance {
        /// Affected user.
        user_id: i64,
    },

    /// Invalid operation on the store.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

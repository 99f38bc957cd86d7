//! Contains the trait and implementation for the object that stores [expenses](crate::Expense).

mod expense;

pub mod sqlite;

pub use expense::ExpenseStore;
pub use sqlite::{SQLiteExpenseStore, TimestampPolicy};

/// Errors originating from a store.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StorageError {
    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    LockError,

    /// A stored timestamp could not be parsed and the store was configured to
    /// reject such rows.
    #[error("could not parse the stored timestamp {0:?}")]
    InvalidTimestamp(String),

    /// A timestamp could not be formatted for storage.
    #[error("could not format timestamp: {0}")]
    TimestampFormat(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        StorageError::SqlError(value)
    }
}

/*! Opening and initializing the application's SQLite database. */

use std::path::Path;

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::stores::{StorageError, sqlite::create_expense_table};

/// Open the SQLite database at `path`, creating the file if it does not exist.
///
/// # Errors
/// Returns a [StorageError::SqlError] if the database cannot be opened.
pub fn open_connection(path: impl AsRef<Path>) -> Result<Connection, StorageError> {
    let connection = Connection::open(path)?;

    Ok(connection)
}

/// Create the tables and indexes for the domain models.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns a [StorageError::SqlError] if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), StorageError> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

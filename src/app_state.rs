//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    expense::ExpenseService,
    stores::{ExpenseStore, SQLiteExpenseStore, TimestampPolicy},
};

/// The state of the REST server.
#[derive(Debug)]
pub struct AppState<S>
where
    S: ExpenseStore + Send + Sync,
{
    /// The service that validates, stores and lists [expenses](crate::Expense).
    pub expense_service: Arc<ExpenseService<S>>,
}

// Derive would require `S: Clone`, but only the `Arc` is cloned.
impl<S> Clone for AppState<S>
where
    S: ExpenseStore + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            expense_service: self.expense_service.clone(),
        }
    }
}

impl<S> AppState<S>
where
    S: ExpenseStore + Send + Sync,
{
    /// Create a new [AppState] around an expense store.
    pub fn new(expense_store: S) -> Self {
        Self {
            expense_service: Arc::new(ExpenseService::new(expense_store)),
        }
    }
}

/// The app state backed by SQLite.
pub type SQLAppState = AppState<SQLiteExpenseStore>;

/// Create a new [AppState] with a SQLite database connection.
///
/// This function will initialize the database by adding the expenses table.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(
    db_connection: Connection,
    timestamp_policy: TimestampPolicy,
) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(SQLiteExpenseStore::new(
        connection,
        timestamp_policy,
    )))
}

//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Params, Row, types::ValueRef};
use time::OffsetDateTime;

use crate::{
    Expense,
    stores::{ExpenseStore, StorageError},
    timestamp::{format_timestamp, parse_timestamp},
};

/// What to do when a stored `created_at` value cannot be parsed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TimestampPolicy {
    /// Log a warning and use the current time for that row.
    ///
    /// Keeps reads working at the cost of hiding corrupted data.
    #[default]
    Lenient,
    /// Fail the whole read with [StorageError::InvalidTimestamp].
    Strict,
}

/// Stores expenses in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
    timestamp_policy: TimestampPolicy,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The expense table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>, timestamp_policy: TimestampPolicy) -> Self {
        Self {
            connection,
            timestamp_policy,
        }
    }

    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            StorageError::LockError
        })
    }

    fn query_expenses<P: Params>(
        &self,
        query: &str,
        params: P,
    ) -> Result<Vec<Expense>, StorageError> {
        let rows = self
            .lock_connection()?
            .prepare(query)?
            .query_map(params, map_row)?
            .collect::<Result<Vec<ExpenseRow>, rusqlite::Error>>()?;

        rows.into_iter()
            .map(|row| self.finalize_row(row))
            .collect()
    }

    fn finalize_row(&self, row: ExpenseRow) -> Result<Expense, StorageError> {
        let created_at = match row.created_at.as_deref().and_then(parse_timestamp) {
            Some(created_at) => created_at,
            None => {
                let raw_created_at = row.created_at.unwrap_or_default();

                match self.timestamp_policy {
                    TimestampPolicy::Lenient => {
                        tracing::warn!(
                            "could not parse created_at {raw_created_at:?} of expense {}, \
                            using the current time instead",
                            row.id
                        );
                        OffsetDateTime::now_utc()
                    }
                    TimestampPolicy::Strict => {
                        return Err(StorageError::InvalidTimestamp(raw_created_at));
                    }
                }
            }
        };

        Ok(Expense {
            id: row.id,
            amount: row.amount,
            category: row.category,
            description: row.description,
            date: row.date,
            created_at,
        })
    }
}

const SELECT_EXPENSES: &str =
    "SELECT id, amount, category, description, date, created_at FROM expenses";

impl ExpenseStore for SQLiteExpenseStore {
    /// Insert `expense` into the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [StorageError::SqlError] if a constraint fails (e.g., duplicate ID) or there is some
    ///   other SQL error,
    /// - or [StorageError::LockError] if the database lock is poisoned.
    fn create(&self, expense: &Expense) -> Result<(), StorageError> {
        let created_at = format_timestamp(expense.created_at)
            .map_err(|error| StorageError::TimestampFormat(error.to_string()))?;

        self.lock_connection()?.execute(
            "INSERT INTO expenses (id, amount, category, description, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &expense.id,
                &expense.amount,
                &expense.category,
                &expense.description,
                &expense.date,
                created_at,
            ),
        )?;

        Ok(())
    }

    fn get_all(&self) -> Result<Vec<Expense>, StorageError> {
        self.query_expenses(SELECT_EXPENSES, ())
    }

    fn get_by_category(&self, category: &str) -> Result<Vec<Expense>, StorageError> {
        self.query_expenses(
            &format!("{SELECT_EXPENSES} WHERE category = ?1"),
            [category],
        )
    }

    fn get_all_sorted_by_date_desc(&self) -> Result<Vec<Expense>, StorageError> {
        self.query_expenses(
            &format!("{SELECT_EXPENSES} ORDER BY date DESC, created_at DESC"),
            (),
        )
    }

    fn get_by_category_sorted_by_date_desc(
        &self,
        category: &str,
    ) -> Result<Vec<Expense>, StorageError> {
        self.query_expenses(
            &format!("{SELECT_EXPENSES} WHERE category = ?1 ORDER BY date DESC, created_at DESC"),
            [category],
        )
    }
}

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expenses (
            id TEXT PRIMARY KEY,
            amount TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category);
        CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);",
    )?;

    Ok(())
}

/// An expense as read from the database, before its timestamp is parsed.
struct ExpenseRow {
    id: String,
    amount: String,
    category: String,
    description: String,
    date: String,
    created_at: Option<String>,
}

fn map_row(row: &Row) -> Result<ExpenseRow, rusqlite::Error> {
    // Anything that is not text cannot be one of the known timestamp formats.
    let created_at = match row.get_ref(5)? {
        ValueRef::Text(text) => Some(String::from_utf8_lossy(text).into_owned()),
        _ => None,
    };

    Ok(ExpenseRow {
        id: row.get(0)?,
        amount: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        created_at,
    })
}

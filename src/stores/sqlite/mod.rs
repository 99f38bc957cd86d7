//! Contains the SQLite backed implementation of [ExpenseStore](crate::ExpenseStore).

mod expense;

pub use expense::{SQLiteExpenseStore, TimestampPolicy, create_expense_table};

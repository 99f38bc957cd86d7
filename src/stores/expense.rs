//! Defines the expense store trait.

use crate::{Expense, stores::StorageError};

/// Handles the creation and retrieval of expenses.
///
/// Implementers must bind every value as a query parameter and never splice
/// user input into a query string.
pub trait ExpenseStore {
    /// Add a fully populated expense to the store.
    fn create(&self, expense: &Expense) -> Result<(), StorageError>;

    /// Retrieve every expense, in no particular order.
    fn get_all(&self) -> Result<Vec<Expense>, StorageError>;

    /// Retrieve the expenses whose category is exactly `category`, in no
    /// particular order.
    fn get_by_category(&self, category: &str) -> Result<Vec<Expense>, StorageError>;

    /// Retrieve every expense, newest date first.
    ///
    /// Expenses with the same date are ordered by creation time, newest first.
    fn get_all_sorted_by_date_desc(&self) -> Result<Vec<Expense>, StorageError>;

    /// Retrieve the expenses in `category`, newest date first.
    ///
    /// Expenses with the same date are ordered by creation time, newest first.
    fn get_by_category_sorted_by_date_desc(
        &self,
        category: &str,
    ) -> Result<Vec<Expense>, StorageError>;
}

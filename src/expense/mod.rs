//! Recording expenses and listing them back.

mod domain;
mod endpoints;
mod service;

pub use domain::{CreateExpenseRequest, Expense, ExpenseListParams};
pub use endpoints::{create_expense_endpoint, get_expenses_endpoint};
pub use service::{ExpenseQuery, ExpenseService, SORT_DATE_DESC};

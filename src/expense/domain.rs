//! Core expense domain types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single spending event.
///
/// Amounts are kept as the string the client sent to avoid any rounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// A UUIDv4 assigned when the expense is created.
    pub id: String,
    /// A non-negative decimal number, e.g. `"100.50"`.
    pub amount: String,
    /// A free-text label such as `"Food"`.
    pub category: String,
    /// What the money was spent on.
    pub description: String,
    /// When the money was spent, as `YYYY-MM-DD`.
    pub date: String,
    /// When the server stored the expense.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The JSON body for creating an expense.
///
/// Every field must be present. Empty strings are caught by validation in
/// [ExpenseService::create_expense](crate::ExpenseService::create_expense).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    /// The amount spent.
    pub amount: String,
    /// The label to file the expense under.
    pub category: String,
    /// What the money was spent on.
    pub description: String,
    /// When the money was spent, as `YYYY-MM-DD`.
    pub date: String,
}

/// The query string for listing expenses.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseListParams {
    /// Only list expenses in this category.
    pub category: Option<String>,
    /// `"date_desc"` to list the newest expenses first, anything else is ignored.
    pub sort: Option<String>,
}

impl ExpenseListParams {
    /// Collect the parameters from decoded query string pairs.
    ///
    /// The first occurrence of a repeated key wins and unknown keys are ignored.
    pub fn from_query_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                "category" if params.category.is_none() => params.category = Some(value),
                "sort" if params.sort.is_none() => params.sort = Some(value),
                _ => {}
            }
        }

        params
    }
}

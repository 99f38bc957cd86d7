//! HTTP handlers for creating and listing expenses.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    expense::{CreateExpenseRequest, ExpenseListParams, ExpenseService},
    stores::ExpenseStore,
};

/// The state needed by the expense endpoints.
#[derive(Debug)]
pub struct ExpenseEndpointState<S> {
    /// The service shared with [AppState].
    pub expense_service: Arc<ExpenseService<S>>,
}

impl<S> Clone for ExpenseEndpointState<S> {
    fn clone(&self) -> Self {
        Self {
            expense_service: self.expense_service.clone(),
        }
    }
}

impl<S> FromRef<AppState<S>> for ExpenseEndpointState<S>
where
    S: ExpenseStore + Send + Sync,
{
    fn from_ref(state: &AppState<S>) -> Self {
        Self {
            expense_service: state.expense_service.clone(),
        }
    }
}

/// A route handler for creating a new expense.
///
/// Responds with `201 Created` and the stored expense on success. Bodies that
/// are not valid JSON or lack a field are reported as `400 Bad Request` in
/// the same shape as validation errors.
pub async fn create_expense_endpoint<S>(
    State(state): State<ExpenseEndpointState<S>>,
    payload: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Response
where
    S: ExpenseStore + Send + Sync + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!("rejected expense body: {rejection}");
            return Error::InvalidRequestBody(rejection.body_text()).into_response();
        }
    };

    match state.expense_service.create_expense(request) {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for listing expenses, optionally filtered by category and
/// sorted by date.
///
/// The query string is taken as raw pairs so that repeated keys do not reject
/// the request; see [ExpenseListParams::from_query_pairs].
pub async fn get_expenses_endpoint<S>(
    State(state): State<ExpenseEndpointState<S>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    S: ExpenseStore + Send + Sync + 'static,
{
    let params = ExpenseListParams::from_query_pairs(pairs);

    match state
        .expense_service
        .get_expenses(params.category.as_deref(), params.sort.as_deref())
    {
        Ok(expenses) => (StatusCode::OK, Json(expenses)).into_response(),
        Err(error) => error.into_response(),
    }
}

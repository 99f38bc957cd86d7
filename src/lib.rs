//! Expense Tracker is a small REST API for recording expenses and listing them
//! back, optionally filtered by category and sorted by date.
//!
//! The HTTP layer is a thin adapter over a service that validates requests and
//! picks a query, which in turn talks to a SQLite backed store.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod config;
mod db;
mod endpoints;
mod expense;
mod id;
mod logging;
mod routing;
mod stores;
mod timestamp;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, SQLAppState, create_app_state};
pub use config::{Config, TimestampPolicyArg};
pub use db::{initialize as initialize_db, open_connection};
pub use expense::{CreateExpenseRequest, Expense, ExpenseQuery, ExpenseService, SORT_DATE_DESC};
pub use id::generate_id;
pub use logging::{LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware};
pub use routing::build_router;
pub use stores::{ExpenseStore, SQLiteExpenseStore, StorageError, TimestampPolicy};
pub use validation::{validate_amount, validate_date};

/// How long open requests may keep running once shutdown has started.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Wait for Ctrl+C or SIGTERM, then tell the server behind `handle` to stop
/// accepting connections and finish within [SHUTDOWN_GRACE_PERIOD].
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let signal_name = shutdown_signal().await;

    tracing::info!("Received {signal_name}, shutting down.");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}

/// Resolve with the name of the first shutdown signal received.
///
/// A signal whose handler cannot be installed is logged and never resolves,
/// so the other signal can still stop the server.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => "Ctrl+C",
            Err(error) => {
                tracing::error!("Could not listen for Ctrl+C: {error}");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                "SIGTERM"
            }
            Err(error) => {
                tracing::error!("Could not listen for SIGTERM: {error}");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was empty, or contained only whitespace.
    ///
    /// Holds the name of the offending field.
    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    /// The amount could not be parsed as a real number.
    #[error("amount must be a valid number")]
    NotANumber,

    /// The amount was less than zero.
    #[error("amount must be positive")]
    NegativeAmount,

    /// The date was not of the form `YYYY-MM-DD`.
    #[error("date must be in YYYY-MM-DD format")]
    BadFormat,

    /// A free-text field was the empty string.
    ///
    /// Holds the name of the offending field.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The request body could not be decoded, e.g. it is not JSON or a
    /// required field is absent.
    #[error("{0}")]
    InvalidRequestBody(String),

    /// The store could not complete the operation.
    ///
    /// The inner error should only be logged for debugging on the server.
    /// When communicating with the client this error should be replaced with
    /// a generic internal server error.
    #[error("storage error: {0}")]
    StorageError(StorageError),
}

impl Error {
    /// Whether the error was caused by the client's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::StorageError(_))
    }
}

impl From<StorageError> for Error {
    fn from(value: StorageError) -> Self {
        Error::StorageError(value)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        StorageError::from(value).into()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::StorageError(error) => {
                tracing::error!("An unexpected storage error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            error => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid request: {error}") })),
            )
                .into_response(),
        }
    }
}

//! Application router configuration.

use std::path::Path;

use axum::{
    Router,
    http::Method,
    middleware,
    routing::post,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::{
    AppState, endpoints,
    expense::{create_expense_endpoint, get_expenses_endpoint},
    logging::logging_middleware,
    stores::ExpenseStore,
};

/// Return a router with all the app's routes.
///
/// Paths other than the API are served from the files in `static_dir`.
pub fn build_router<S>(state: AppState<S>, static_dir: impl AsRef<Path>) -> Router
where
    S: ExpenseStore + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route(
            endpoints::EXPENSES_API,
            post(create_expense_endpoint::<S>).get(get_expenses_endpoint::<S>),
        )
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors)
}

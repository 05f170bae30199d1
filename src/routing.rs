//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::{get, post, put},
};

use crate::{
    AppState, Error,
    auth::{auth_guard, log_in, register_user},
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    dashboard::{
        get_category_spending_endpoint, get_monthly_trends_endpoint, get_summary_endpoint,
    },
    db::check_connection,
    endpoints,
    json::MessageResponse,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route except the health check, registration and log in requires a
/// bearer token.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::TEST_DB, get(get_test_db))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(log_in))
        .method_not_allowed_fallback(get_405_method_not_allowed);

    let protected_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::DASHBOARD_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::DASHBOARD_MONTHLY_TRENDS,
            get(get_monthly_trends_endpoint),
        )
        .route(
            endpoints::DASHBOARD_CATEGORY_SPENDING,
            get(get_category_spending_endpoint),
        )
        // Set before the auth layer so the fallback is wrapped by it too.
        .method_not_allowed_fallback(get_405_method_not_allowed)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Check that the server can query the database.
async fn get_test_db(State(state): State<AppState>) -> Result<Json<MessageResponse>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    check_connection(&connection)
        .inspect_err(|error| tracing::error!("database health check failed: {error}"))?;

    Ok(MessageResponse::json("Database connected successfully!"))
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

async fn get_405_method_not_allowed() -> Error {
    Error::MethodNotAllowed
}

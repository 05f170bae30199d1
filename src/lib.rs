//! A personal finance tracker for recording income and expenses.
//!
//! This library provides a JSON REST API where each registered user manages
//! their own categories and transactions, and gets dashboard reports computed
//! from them. Users log in with an email and password and then authenticate
//! with a bearer token.
//!
//! The [client] module holds a client for the API that keeps track of the
//! logged in session.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod category;
pub mod client;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod json;
mod logging;
mod ownership;
mod path;
mod routing;
#[cfg(test)]
mod test_utils;
mod transaction;
mod transaction_type;

pub use app_state::AppState;
pub use auth::{
    Claims, LogInForm, LogInResponse, PasswordHash, PublicUser, RegisterForm, RegisterResponse,
    User, UserID, create_user, get_user_by_email, get_user_by_id,
};
pub use category::{
    Category, CategoryForm, CategoryId, CategoryName, CreateCategoryResponse, create_category,
    get_categories, get_category,
};
pub use dashboard::{CategorySpending, MonthlyComparison, MonthlyTotal, MonthlyTrends, Summary};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use json::MessageResponse;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use transaction::{
    CreateTransactionResponse, NewTransaction, NumberOrString, Transaction, TransactionForm,
    TransactionId, create_transaction, get_transaction, get_transactions,
};
pub use transaction_type::TransactionType;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

//! Transaction update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    json::{AppJson, MessageResponse},
    path::AppPath,
    ownership::ensure_owned,
    transaction::{Transaction, TransactionForm, TransactionId, update_transaction},
};

/// The state needed for updating a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Overwrite one of the logged in user's transactions.
///
/// The ownership check, the category check and the update run in one SQL
/// transaction. Ownership is checked first, so a request for another user's
/// transaction is always answered with [Error::NotFound].
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// another user, [Error::Validation] for an invalid form and
/// [Error::InvalidCategory] if the category does not belong to the user.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    Extension(user_id): Extension<UserID>,
    AppPath(transaction_id): AppPath<TransactionId>,
    AppJson(form): AppJson<TransactionForm>,
) -> Result<Json<MessageResponse>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = connection.unchecked_transaction()?;

    ensure_owned::<Transaction>(transaction_id, user_id, &transaction)?;
    let new_transaction = form.validate()?;
    update_transaction(transaction_id, user_id, &new_transaction, &transaction)?;

    transaction.commit()?;

    Ok(MessageResponse::json("Transaction updated successfully!"))
}

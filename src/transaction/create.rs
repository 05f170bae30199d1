//! Transaction creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::UserID,
    json::AppJson,
    transaction::{TransactionForm, TransactionId, create_transaction},
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a successful transaction creation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    pub message: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: TransactionId,
}

/// Record a transaction for the logged in user.
///
/// # Errors
///
/// Returns an [Error::Validation] for missing or invalid fields and
/// [Error::InvalidCategory] if the category does not belong to the user.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    AppJson(form): AppJson<TransactionForm>,
) -> Result<(StatusCode, Json<CreateTransactionResponse>), Error> {
    let new_transaction = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction_id = create_transaction(
        user_id,
        &new_transaction,
        OffsetDateTime::now_utc(),
        &connection,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTransactionResponse {
            message: "Transaction added successfully!".to_owned(),
            transaction_id,
        }),
    ))
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::UserID,
        category::{CategoryName, create_category},
        db::initialize,
        json::AppJson,
        test_utils::insert_test_user,
        transaction::{TransactionForm, get_transaction},
        transaction_type::TransactionType,
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_test_state() -> (CreateTransactionState, UserID, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let alice = insert_test_user("alice@x.com", &connection);
        let bob = insert_test_user("bob@x.com", &connection);

        (
            CreateTransactionState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            alice,
            bob,
        )
    }

    fn form(category_id: Option<i64>) -> AppJson<TransactionForm> {
        AppJson(TransactionForm {
            amount: Some(1000.0.into()),
            transaction_type: Some("income".to_owned()),
            description: None,
            transaction_date: Some("2024-01-15".to_owned()),
            category_id: category_id.map(Into::into),
        })
    }

    #[tokio::test]
    async fn create_transaction_succeeds() {
        let (state, alice, _) = get_test_state();
        let category = create_category(
            alice,
            CategoryName::new_unchecked("Salary"),
            TransactionType::Income,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let (status, body) = create_transaction_endpoint(
            State(state.clone()),
            Extension(alice),
            form(Some(category.id)),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.message, "Transaction added successfully!");
        let got = get_transaction(
            body.transaction_id,
            alice,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(got.amount, 1000.0);
        assert_eq!(got.transaction_date, date!(2024 - 01 - 15));
        assert_eq!(got.category_name.as_deref(), Some("Salary"));
    }

    #[tokio::test]
    async fn create_transaction_with_other_users_category_fails() {
        let (state, alice, bob) = get_test_state();
        let category = create_category(
            bob,
            CategoryName::new_unchecked("Salary"),
            TransactionType::Income,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let result =
            create_transaction_endpoint(State(state), Extension(alice), form(Some(category.id)))
                .await;

        assert_eq!(result.unwrap_err(), Error::InvalidCategory);
    }

    #[tokio::test]
    async fn create_transaction_without_amount_fails() {
        let (state, alice, _) = get_test_state();
        let AppJson(mut form) = form(None);
        form.amount = None;

        let result =
            create_transaction_endpoint(State(state), Extension(alice), AppJson(form)).await;

        assert_eq!(
            result.unwrap_err(),
            Error::Validation("Amount, type, and date are required.".to_owned())
        );
    }
}

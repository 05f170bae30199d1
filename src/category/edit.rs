//! Category update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{Category, CategoryForm, CategoryId, update_category},
    json::{AppJson, MessageResponse},
    path::AppPath,
    ownership::ensure_owned,
};

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Rename a category or change its type.
///
/// Ownership is checked before the form is validated, so a request for
/// another user's category is always answered with [Error::NotFound].
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist or belongs to
/// another user, [Error::Validation] for an invalid form and
/// [Error::DuplicateCategory] if the new name and type are taken.
pub async fn update_category_endpoint(
    State(state): State<UpdateCategoryState>,
    Extension(user_id): Extension<UserID>,
    AppPath(category_id): AppPath<CategoryId>,
    AppJson(form): AppJson<CategoryForm>,
) -> Result<Json<MessageResponse>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = connection.unchecked_transaction()?;

    ensure_owned::<Category>(category_id, user_id, &transaction)?;
    let (name, category_type) = form.validate()?;
    update_category(category_id, user_id, name, category_type, &transaction)?;

    transaction.commit()?;

    Ok(MessageResponse::json("Category updated successfully!"))
}

#[cfg(test)]
mod update_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::State,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::UserID,
        category::{Category, CategoryForm, CategoryName, create_category, get_category},
        db::initialize,
        json::AppJson,
        path::AppPath,
        test_utils::insert_test_user,
        transaction_type::TransactionType,
    };

    use super::{UpdateCategoryState, update_category_endpoint};

    struct Fixture {
        state: UpdateCategoryState,
        alice: UserID,
        bob: UserID,
        category: Category,
    }

    fn get_fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let alice = insert_test_user("alice@x.com", &connection);
        let bob = insert_test_user("bob@x.com", &connection);
        let category = create_category(
            alice,
            CategoryName::new_unchecked("Rent"),
            TransactionType::Expense,
            &connection,
        )
        .unwrap();

        Fixture {
            state: UpdateCategoryState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            alice,
            bob,
            category,
        }
    }

    fn form(name: &str, category_type: &str) -> AppJson<CategoryForm> {
        AppJson(CategoryForm {
            name: Some(name.to_owned()),
            category_type: Some(category_type.to_owned()),
        })
    }

    #[tokio::test]
    async fn update_category_succeeds() {
        let fixture = get_fixture();

        let body = update_category_endpoint(
            State(fixture.state.clone()),
            Extension(fixture.alice),
            AppPath(fixture.category.id),
            form("Housing", "expense"),
        )
        .await
        .unwrap();

        assert_eq!(body.message, "Category updated successfully!");
        let got = get_category(
            fixture.category.id,
            fixture.alice,
            &fixture.state.db_connection.lock().unwrap(),
        )
        .unwrap();
        assert_eq!(got.name.as_ref(), "Housing");
    }

    #[tokio::test]
    async fn update_other_users_category_is_not_found() {
        let fixture = get_fixture();

        let result = update_category_endpoint(
            State(fixture.state.clone()),
            Extension(fixture.bob),
            AppPath(fixture.category.id),
            form("Mine", "expense"),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn invalid_form_for_other_users_category_is_not_found() {
        let fixture = get_fixture();

        let result = update_category_endpoint(
            State(fixture.state),
            Extension(fixture.bob),
            AppPath(fixture.category.id),
            form("", "nonsense"),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn invalid_form_for_own_category_is_validation_error() {
        let fixture = get_fixture();

        let result = update_category_endpoint(
            State(fixture.state),
            Extension(fixture.alice),
            AppPath(fixture.category.id),
            form("Rent", "nonsense"),
        )
        .await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn update_into_duplicate_conflicts() {
        let fixture = get_fixture();
        let other = create_category(
            fixture.alice,
            CategoryName::new_unchecked("Food"),
            TransactionType::Expense,
            &fixture.state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let result = update_category_endpoint(
            State(fixture.state),
            Extension(fixture.alice),
            AppPath(other.id),
            form("Rent", "expense"),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::DuplicateCategory);
    }
}

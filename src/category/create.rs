//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::UserID,
    category::{CategoryForm, CategoryId, create_category},
    json::AppJson,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a successful category creation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryResponse {
    pub message: String,
    #[serde(rename = "categoryId")]
    pub category_id: CategoryId,
}

/// Create a category for the logged in user.
///
/// # Errors
///
/// Returns an [Error::Validation] for a missing name or type or an invalid
/// type, and [Error::DuplicateCategory] if the user already has a category
/// with the same name and type.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Extension(user_id): Extension<UserID>,
    AppJson(form): AppJson<CategoryForm>,
) -> Result<(StatusCode, Json<CreateCategoryResponse>), Error> {
    let (name, category_type) = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = create_category(user_id, name, category_type, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCategoryResponse {
            message: "Category added successfully!".to_owned(),
            category_id: category.id,
        }),
    ))
}

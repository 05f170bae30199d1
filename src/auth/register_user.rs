//! The endpoint for registering a new user account.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{PasswordHash, UserID, create_user, get_user_by_email},
    json::AppJson,
};

/// The state needed for registering a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The database connection for storing the new user.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost for hashing the new user's password.
    pub password_hash_cost: u32,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            password_hash_cost: state.password_hash_cost,
        }
    }
}

/// The data sent by the client to register an account.
///
/// Fields are optional so that a missing field is reported with the same
/// message as an empty one.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The body of a successful registration response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: UserID,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Handler for registration requests.
///
/// The password is hashed before the user is stored. Neither the password nor
/// its hash ever leaves this function.
///
/// # Errors
///
/// This function will return an error if:
/// - a field is missing or empty ([Error::Validation]),
/// - the email is not a valid email address ([Error::Validation]),
/// - the email is already registered ([Error::DuplicateEmail]),
/// - hashing the password or accessing the database failed.
pub async fn register_user(
    State(state): State<RegistrationState>,
    AppJson(form): AppJson<RegisterForm>,
) -> Result<(StatusCode, Json<RegisterResponse>), Error> {
    let (Some(username), Some(raw_email), Some(password)) = (
        non_empty(&form.username),
        non_empty(&form.email),
        form.password.as_deref().filter(|password| !password.is_empty()),
    ) else {
        return Err(Error::Validation("All fields are required.".to_owned()));
    };

    let email = EmailAddress::from_str(raw_email)
        .map_err(|_| Error::Validation("Please enter a valid email address.".to_owned()))?;

    {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(email.as_str(), &connection) {
            Ok(_) => return Err(Error::DuplicateEmail),
            Err(Error::NotFound) => {}
            Err(error) => return Err(error),
        }
    }

    let password_hash = PasswordHash::new(password, state.password_hash_cost)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    // The unique constraint on the email column catches a registration that
    // raced the check above.
    let user = create_user(username, email, password_hash, &connection)?;

    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully!".to_owned(),
            user_id: user.id,
        }),
    ))
}

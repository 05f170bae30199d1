//! The endpoint for logging in and receiving a bearer token.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::{
        PasswordHash, PublicUser, get_user_by_email,
        token::{JwtKeys, encode_token},
    },
    json::AppJson,
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The keys for signing tokens.
    pub jwt_keys: JwtKeys,
    /// How long an issued token is valid for.
    pub token_duration: Duration,
    /// Checked instead of a real hash when the email is unknown.
    pub dummy_password_hash: PasswordHash,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            jwt_keys: state.jwt_keys.clone(),
            token_duration: state.token_duration,
            dummy_password_hash: state.dummy_password_hash.clone(),
        }
    }
}

/// The raw data entered by the user in the log-in form.
///
/// There is no need for validation here since the credentials are compared
/// against the registered users.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LogInForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The body of a successful log-in response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogInResponse {
    pub message: String,
    /// The bearer token to send with requests to protected routes.
    pub token: String,
    pub user: PublicUser,
    /// When `token` expires.
    #[serde(rename = "expiresAt", with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email or password is missing ([Error::Validation]).
/// - The email does not belong to a registered user ([Error::InvalidCredentials]).
/// - The password is not correct ([Error::InvalidCredentials]).
///
/// An unknown email is checked against a dummy password hash, so it takes as
/// long to reject as a wrong password.
/// - An internal error occurred when verifying the password or signing the token.
pub async fn log_in(
    State(state): State<LoginState>,
    AppJson(form): AppJson<LogInForm>,
) -> Result<Json<LogInResponse>, Error> {
    let (Some(email), Some(password)) = (
        form.email.as_deref().map(str::trim).filter(|email| !email.is_empty()),
        form.password.as_deref().filter(|password| !password.is_empty()),
    ) else {
        return Err(Error::Validation(
            "Email and password are required.".to_owned(),
        ));
    };

    let user = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(email, &connection) {
            Ok(user) => Some(user),
            Err(Error::NotFound) => None,
            Err(error) => return Err(error),
        }
    };

    let Some(user) = user else {
        verify_password(&state.dummy_password_hash, password)?;
        return Err(Error::InvalidCredentials);
    };

    if !verify_password(&user.password_hash, password)? {
        return Err(Error::InvalidCredentials);
    }

    let public_user = user.to_public();
    let issued = encode_token(
        &public_user,
        OffsetDateTime::now_utc(),
        state.token_duration,
        &state.jwt_keys,
    )?;

    tracing::info!("User {} logged in", public_user.id);

    Ok(Json(LogInResponse {
        message: "Login successful!".to_owned(),
        token: issued.token,
        user: public_user,
        expires_at: issued.expires_at,
    }))
}

fn verify_password(password_hash: &PasswordHash, password: &str) -> Result<bool, Error> {
    password_hash.verify(password).map_err(|error| {
        tracing::error!("Unhandled error while verifying credentials: {error}");
        Error::HashingError(error.to_string())
    })
}

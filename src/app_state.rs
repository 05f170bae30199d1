//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Duration;

use crate::{
    Error,
    auth::{DEFAULT_TOKEN_DURATION, JwtKeys, PasswordHash},
    db::initialize,
};

/// The state of the REST server.
///
/// Handlers do not take the whole state. Each one declares a smaller state
/// struct that implements `FromRef<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The keys for signing and verifying bearer tokens.
    pub jwt_keys: JwtKeys,

    /// The duration for which bearer tokens are valid.
    pub token_duration: Duration,

    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,

    /// A hash with the same cost as new passwords, verified against when a
    /// log in names an unknown email.
    pub dummy_password_hash: PasswordHash,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// The token signing keys are derived from `jwt_secret`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or if
    /// `password_hash_cost` is not a valid bcrypt cost.
    pub fn new(
        db_connection: Connection,
        jwt_secret: &str,
        password_hash_cost: u32,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;
        let dummy_password_hash = PasswordHash::new("dummy password", password_hash_cost)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            jwt_keys: JwtKeys::from_secret(jwt_secret),
            token_duration: DEFAULT_TOKEN_DURATION,
            password_hash_cost,
            dummy_password_hash,
        })
    }
}

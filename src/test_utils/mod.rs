#![allow(missing_docs)]

use std::str::FromStr;

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    AppState,
    auth::{PasswordHash, UserID, create_user},
};

/// The bcrypt cost used in tests, the lowest bcrypt allows.
pub(crate) const TEST_PASSWORD_HASH_COST: u32 = 4;

/// Insert a user with a dummy password hash and return their ID.
#[track_caller]
pub(crate) fn insert_test_user(email: &str, connection: &Connection) -> UserID {
    let email = EmailAddress::from_str(email).expect("Invalid test email");
    let username = email.local_part().to_owned();

    create_user(
        &username,
        email,
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
    .id
}

/// An app state backed by an in-memory database.
pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "foobar", TEST_PASSWORD_HASH_COST)
        .expect("Could not create app state")
}

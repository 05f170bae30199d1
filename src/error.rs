//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or a field had an invalid value.
    ///
    /// The string is shown to the client, so it should explain how to fix the
    /// request.
    #[error("{0}")]
    Validation(String),

    /// The request body could not be parsed as JSON of the expected shape.
    #[error("invalid request body: {0}")]
    InvalidJson(String),

    /// A path parameter could not be parsed, e.g. a non-numeric ID.
    #[error("{0}")]
    InvalidPath(String),

    /// The request body is larger than the server accepts.
    #[error("Request body is too large.")]
    PayloadTooLarge,

    /// The route exists but does not support the request method.
    #[error("Method not allowed.")]
    MethodNotAllowed,

    /// The request did not carry a bearer token.
    #[error("Access Denied: No token provided.")]
    MissingToken,

    /// The bearer token was malformed, tampered with or has expired.
    #[error("Access Denied: Invalid token.")]
    InvalidToken,

    /// The email does not belong to a user or the password is wrong.
    ///
    /// Both cases share this variant so clients cannot tell them apart.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// The email used to register is already taken.
    #[error("Email already registered.")]
    DuplicateEmail,

    /// The user already has a category with the same name and type.
    #[error("Category with this name and type already exists for this user.")]
    DuplicateCategory,

    /// The category referenced by a transaction does not exist or belongs to
    /// another user.
    #[error("Invalid category ID or category does not belong to user.")]
    InvalidCategory,

    /// The requested resource was not found.
    ///
    /// Resources owned by other users are reported as not found too, so that
    /// clients cannot discover the existence of other users' data.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("The requested resource could not be found.")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The server could not sign a token.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("users.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("categories.") =>
            {
                Error::DuplicateCategory
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPath(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::InvalidJson(_)
            | Error::InvalidPath(_)
            | Error::InvalidCategory => StatusCode::BAD_REQUEST,
            Error::MissingToken | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::InvalidToken => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::DuplicateEmail | Error::DuplicateCategory => StatusCode::CONFLICT,
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details stay in the server logs.
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal server error.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;
    use serde_json::Value;

    use crate::Error;

    async fn response_message(error: Error) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();

        (status, json["message"].as_str().unwrap().to_owned())
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized_and_invalid_token_is_forbidden() {
        let (status, _) = response_message(Error::MissingToken).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = response_message(Error::InvalidToken).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let error = Error::SqlError(rusqlite::Error::InvalidQuery);

        let (status, message) = response_message(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error.");
    }

    #[tokio::test]
    async fn validation_message_is_shown_to_client() {
        let error = Error::Validation("All fields are required.".to_owned());

        let (status, message) = response_message(error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "All fields are required.");
    }

    #[tokio::test]
    async fn request_shape_errors_have_their_own_status() {
        let (status, message) = response_message(Error::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(message, "Method not allowed.");

        let (status, message) = response_message(Error::PayloadTooLarge).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(message, "Request body is too large.");

        let (status, _) = response_message(Error::InvalidPath("bad id".to_owned())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let connection = Connection::open_in_memory().unwrap();

        let error: Error = connection
            .query_row("SELECT 1 WHERE 0", [], |row| row.get::<_, i64>(0))
            .unwrap_err()
            .into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn unique_email_violation_maps_to_duplicate_email() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch(
                "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT UNIQUE NOT NULL);
                 INSERT INTO users (email) VALUES ('a@b.c');",
            )
            .unwrap();

        let error: Error = connection
            .execute("INSERT INTO users (email) VALUES ('a@b.c')", [])
            .unwrap_err()
            .into();

        assert_eq!(error, Error::DuplicateEmail);
    }
}

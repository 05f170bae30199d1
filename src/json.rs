//! A JSON body extractor that reports malformed bodies as `400 Bad Request`.
//!
//! The default [axum::Json] extractor answers `422 Unprocessable Entity` when a
//! body parses but does not match the expected type. Clients of this API get
//! `400` for every malformed body instead, with a JSON error message.

use axum::{Json, extract::FromRequest};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Extracts a JSON request body, rejecting with [Error::InvalidJson].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct AppJson<T>(pub T);

/// A response body that only carries a message for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Wrap `message` in a JSON response body.
    pub fn json(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_owned(),
        })
    }
}

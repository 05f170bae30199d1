//! A path parameter extractor that reports bad parameters as JSON errors.

use axum::extract::FromRequestParts;

use crate::Error;

/// Extracts path parameters, rejecting with [Error::InvalidPath].
///
/// For example, `/api/categories/abc` is rejected with a 400 JSON error
/// instead of axum's plain text rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct AppPath<T>(pub T);

//! Authentication middleware that verifies bearer tokens on protected routes.

use axum::{
    extract::{FromRef, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState, Error,
    auth::token::{JwtKeys, decode_token},
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The keys for verifying bearer tokens.
    pub jwt_keys: JwtKeys,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            jwt_keys: state.jwt_keys.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the
/// `Authorization` header.
///
/// If the token is valid, the user ID from the token is placed into the request
/// and the request is executed normally. Otherwise the request is rejected:
/// - no token (missing header or nothing after the scheme) gives
///   [Error::MissingToken] (401),
/// - anything else that does not decode to a live token gives
///   [Error::InvalidToken] (403). This includes other schemes such as
///   `Basic abc`, since the scheme word is not checked.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    let (mut parts, body) = request.into_parts();

    let token = extract_token(&parts.headers)?;
    let claims = decode_token(token, &state.jwt_keys)?;

    parts.extensions.insert(claims.id);
    let request = Request::from_parts(parts, body);

    Ok(next.run(request).await)
}

/// Get the second space separated part of the `Authorization` header.
fn extract_token(headers: &HeaderMap) -> Result<&str, Error> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(Error::MissingToken)?
        .to_str()
        .map_err(|_| Error::InvalidToken)?;

    match value.split(' ').nth(1) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::MissingToken),
    }
}

//! Signed, time-limited bearer tokens (JSON Web Tokens).
//!
//! A token is either valid (the signature verifies and it has not expired) or
//! invalid. There is no revocation list and no refresh: once a token expires
//! the user has to log in again.

// Adapted from https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{PublicUser, UserID},
};

/// How long a token is valid for after it is issued.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(1);

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub id: UserID,
    /// The username of the user the token was issued to.
    pub username: String,
    /// The email of the user the token was issued to.
    pub email: String,
    /// The time the token was issued, in seconds since the Unix epoch.
    pub iat: usize,
    /// The expiry time of the token, in seconds since the Unix epoch.
    pub exp: usize,
}

/// The keys for signing and verifying tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Derive the HMAC keys from a `secret` string.
    pub fn from_secret(secret: &str) -> Self {
        let hash = Sha512::digest(secret);

        Self {
            encoding_key: EncodingKey::from_secret(&hash),
            decoding_key: DecodingKey::from_secret(&hash),
        }
    }
}

/// A freshly signed token and the moment it stops being valid.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Sign a token for `user` that expires `duration` after `issued_at`.
///
/// # Errors
///
/// Returns an [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(
    user: &PublicUser,
    issued_at: OffsetDateTime,
    duration: Duration,
    keys: &JwtKeys,
) -> Result<IssuedToken, Error> {
    let expires_at = issued_at + duration;
    let claims = Claims {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        iat: issued_at.unix_timestamp() as usize,
        exp: expires_at.unix_timestamp() as usize,
    };

    let token = encode(&Header::default(), &claims, &keys.encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))?;

    Ok(IssuedToken { token, expires_at })
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
///
/// Returns an [Error::InvalidToken] if the token is malformed, was not signed
/// with `keys` or has expired.
pub fn decode_token(token: &str, keys: &JwtKeys) -> Result<Claims, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is exact, no grace period.
    validation.leeway = 0;

    decode::<Claims>(token, &keys.decoding_key, &validation)
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::debug!("Token verification failed: {error}");
            Error::InvalidToken
        })
}

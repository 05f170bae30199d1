use reqwest::StatusCode;

/// The errors that may occur when calling the API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A protected route was called without logging in first.
    #[error("not logged in")]
    NotLoggedIn,

    /// The session token expired or was rejected by the server.
    ///
    /// The session has been cleared, the user needs to log in again.
    #[error("the session has expired, please log in again")]
    SessionExpired,

    /// The server answered with an error status.
    #[error("{status}: {message}")]
    Api {
        /// The HTTP status of the response.
        status: StatusCode,
        /// The message from the response body.
        message: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

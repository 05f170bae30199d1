//! Middleware for logging requests and responses.
//!
//! Passwords and tokens never reach the logs: JSON fields named `password` or
//! `token` and the `Authorization` header are replaced with a placeholder.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, CONTENT_LENGTH},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

const REDACTED: &str = "********";
const SECRET_FIELDS: [&str; 2] = ["password", "token"];
const LOG_BODY_LENGTH_LIMIT: usize = 64;
/// The largest request body, in bytes, that is buffered. Larger requests get 413.
const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Request bodies over [REQUEST_BODY_LIMIT] bytes are rejected with
/// [Error::PayloadTooLarge] without being read in full.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    if declared_length(&parts.headers).is_some_and(|length| length > REQUEST_BODY_LIMIT) {
        tracing::warn!("rejecting request with a body over {REQUEST_BODY_LIMIT} bytes");
        return Error::PayloadTooLarge.into_response();
    }

    // Also covers bodies without a content length that run over the limit.
    let body_bytes = match axum::body::to_bytes(body, REQUEST_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("could not read request body within {REQUEST_BODY_LIMIT} bytes: {error}");
            return Error::PayloadTooLarge.into_response();
        }
    };

    log_request(&parts, &redact_body(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &redact_body(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Render `body` as text with the values of secret JSON fields replaced.
///
/// Bodies that are not JSON are returned as lossy UTF-8.
fn redact_body(body: &Bytes) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(mut json) => {
            redact_json(&mut json);
            json.to_string()
        }
        Err(_) => String::from_utf8_lossy(body).to_string(),
    }
}

fn redact_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if SECRET_FIELDS.contains(&key.as_str()) {
                    *value = Value::String(REDACTED.to_owned());
                } else {
                    redact_json(value);
                }
            }
        }
        Value::Array(values) => values.iter_mut().for_each(redact_json),
        _ => {}
    }
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    headers
}

/// Cut `body` to at most [LOG_BODY_LENGTH_LIMIT] characters.
///
/// Returns `None` if the body is short enough to log in full.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    let method = &parts.method;
    let uri = &parts.uri;
    let headers = redact_headers(&parts.headers);

    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Received request: {method} {uri} {headers:?}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {method} {uri} {headers:?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    let status = parts.status;
    let headers = &parts.headers;

    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {status} {headers:?}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {status} {headers:?}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{
        Json, Router,
        body::Bytes,
        http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
        middleware,
        routing::post,
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{
        LOG_BODY_LENGTH_LIMIT, REQUEST_BODY_LIMIT, logging_middleware, redact_body,
        redact_headers, truncate,
    };

    async fn echo(Json(body): Json<Value>) -> Json<Value> {
        Json(body)
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[test]
    fn redacts_password_and_token_fields() {
        let body = Bytes::from(
            json!({
                "email": "alice@x.com",
                "password": "pw12345",
                "nested": [{ "token": "abc.def.ghi" }],
            })
            .to_string(),
        );

        let redacted: Value = serde_json::from_str(&redact_body(&body)).unwrap();

        assert_eq!(
            redacted,
            json!({
                "email": "alice@x.com",
                "password": "********",
                "nested": [{ "token": "********" }],
            })
        );
    }

    #[test]
    fn non_json_body_is_logged_as_text() {
        assert_eq!(redact_body(&Bytes::from_static(b"hello")), "hello");
        assert_eq!(redact_body(&Bytes::new()), "");
    }

    #[test]
    fn redacts_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));

        let redacted = redact_headers(&headers);

        assert_eq!(redacted[AUTHORIZATION], "********");
        assert_eq!(headers[AUTHORIZATION], "Bearer secret");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        let short = "a".repeat(LOG_BODY_LENGTH_LIMIT);
        let long = "é".repeat(LOG_BODY_LENGTH_LIMIT + 1);

        assert_eq!(truncate(&short), None);
        assert_eq!(
            truncate(&long).map(|text| text.chars().count()),
            Some(LOG_BODY_LENGTH_LIMIT)
        );
    }

    #[tokio::test]
    async fn middleware_passes_bodies_through_unchanged() {
        let server = get_test_server();
        let body = json!({ "email": "alice@x.com", "password": "pw12345" });

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), body);
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let server = get_test_server();

        let response = server
            .post("/echo")
            .bytes(Bytes::from(vec![b' '; REQUEST_BODY_LIMIT + 1]))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.json::<Value>(),
            json!({ "message": "Request body is too large." })
        );
    }
}

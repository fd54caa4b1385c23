//! Test response wrapper.

use crate::error::TestError;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use waypost_core::{DispatchResult, ServerResponse};

/// What the dispatcher produced, with helpers for assertions.
///
/// An unhandled request is surfaced as `404 Not Found` with an empty body,
/// the way an HTTP adapter would answer it; [`was_handled`](Self::was_handled)
/// tells the two apart.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    handled: bool,
}

impl TestResponse {
    /// Creates a test response from raw parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            handled: true,
        }
    }

    /// Converts a dispatch result.
    pub fn from_dispatch(result: DispatchResult) -> Self {
        match result {
            DispatchResult::Handled(response) => Self::from(response),
            DispatchResult::Unhandled => Self {
                status: StatusCode::NOT_FOUND,
                headers: HeaderMap::new(),
                body: Bytes::new(),
                handled: false,
            },
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns false when no endpoint took the request.
    #[must_use]
    pub fn was_handled(&self) -> bool {
        self.handled
    }

    /// Returns true if the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true if the status is 4xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str("content-type")
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Deserializes the body as a JSON value.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        self.json()
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {} (body: {:?})",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts the status code as a u16.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    #[track_caller]
    pub fn assert_status_code(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "Expected status {}, got {} (body: {:?})",
            expected,
            self.status.as_u16(),
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts that some endpoint handled the request.
    ///
    /// # Panics
    ///
    /// Panics if dispatch fell through every endpoint.
    #[track_caller]
    pub fn assert_handled(&self) -> &Self {
        assert!(self.handled, "Expected the request to be handled");
        self
    }

    /// Asserts that no endpoint handled the request.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint produced a response.
    #[track_caller]
    pub fn assert_unhandled(&self) -> &Self {
        assert!(
            !self.handled,
            "Expected no endpoint to handle the request, got {}",
            self.status
        );
        self
    }

    /// Asserts a header value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or different.
    #[track_caller]
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(
            actual, expected,
            "Header '{}': expected '{}', got '{}'",
            name, expected, actual
        );
        self
    }

    /// Asserts that the Content-Type starts with `expected`.
    ///
    /// # Panics
    ///
    /// Panics if Content-Type is missing or different.
    #[track_caller]
    pub fn assert_content_type(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let actual = self
            .content_type()
            .unwrap_or_else(|| panic!("Content-Type header not found"));
        assert!(
            actual.starts_with(expected),
            "Content-Type: expected '{}', got '{}'",
            expected,
            actual
        );
        self
    }

    /// Asserts the exact body text.
    ///
    /// # Panics
    ///
    /// Panics if the body is not UTF-8 or differs.
    #[track_caller]
    pub fn assert_body_eq(&self, expected: impl AsRef<str>) -> &Self {
        let body = String::from_utf8_lossy(&self.body);
        assert_eq!(body, expected.as_ref(), "Body mismatch");
        self
    }

    /// Asserts that the body contains a substring.
    ///
    /// # Panics
    ///
    /// Panics if the substring is absent.
    #[track_caller]
    pub fn assert_body_contains(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let body = String::from_utf8_lossy(&self.body);
        assert!(
            body.contains(expected),
            "Body should contain '{}', got: {}",
            expected,
            body
        );
        self
    }

    /// Asserts that a dotted JSON path (`items.0.name`) equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON, the path is absent, or the value
    /// differs.
    #[track_caller]
    pub fn assert_json_field(&self, path: impl AsRef<str>, expected: &serde_json::Value) -> &Self {
        let path = path.as_ref();
        let json = self
            .json_value()
            .unwrap_or_else(|e| panic!("Body should be valid JSON: {e}"));
        let actual = json_path(&json, path)
            .unwrap_or_else(|| panic!("JSON path '{}' not found in: {:?}", path, json));
        assert_eq!(
            actual, expected,
            "JSON field '{}': expected {:?}, got {:?}",
            path, expected, actual
        );
        self
    }
}

impl From<ServerResponse> for TestResponse {
    fn from(response: ServerResponse) -> Self {
        let response = response.into_http();
        let (parts, body) = response.into_parts();
        Self::new(parts.status, parts.headers, body)
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("handled", &self.handled)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}

fn json_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match segment.parse::<usize>() {
            Ok(index) => current.get(index)?,
            Err(_) => current.get(segment)?,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use serde_json::json;

    fn json_response(body: &str) -> TestResponse {
        TestResponse::from(
            ServerResponse::new(StatusCode::BAD_REQUEST)
                .with_content_type("application/json")
                .with_body(body.to_string()),
        )
    }

    #[test]
    fn test_unhandled_is_not_found() {
        let response = TestResponse::from_dispatch(DispatchResult::Unhandled);
        response.assert_status(StatusCode::NOT_FOUND).assert_unhandled();
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_handled_keeps_parts() {
        let response = TestResponse::from_dispatch(DispatchResult::Handled(
            ServerResponse::ok().with_content_type("text/plain").with_body("ab"),
        ));

        response
            .assert_handled()
            .assert_status_code(200)
            .assert_content_type("text/plain")
            .assert_body_eq("ab");
        assert!(response.is_success());
    }

    #[test]
    fn test_json_field() {
        let response = json_response(r#"{"code":"MISSING_INPUT","input":{"names":["count"]}}"#);
        assert!(response.is_client_error());
        response
            .assert_json_field("code", &json!("MISSING_INPUT"))
            .assert_json_field("input.names.0", &json!("count"))
            .assert_header(CONTENT_TYPE.as_str(), "application/json");
    }

    #[test]
    #[should_panic(expected = "Expected status")]
    fn test_assert_status_panics() {
        json_response("{}").assert_status(StatusCode::OK);
    }

    #[test]
    fn test_text_rejects_invalid_utf8() {
        let response = TestResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from_static(&[0xff]),
        );
        assert!(matches!(response.text(), Err(TestError::BodyRead(_))));
    }
}

//! Test request building.

use crate::error::TestError;
use bytes::Bytes;
use http::{header, Method};
use serde::Serialize;
use waypost_extract::ServerRequest;

/// Entry points for building a [`ServerRequest`] in tests.
///
/// # Example
///
/// ```
/// use waypost_test::TestRequest;
///
/// let request = TestRequest::get("/echo")
///     .query("count", "3")
///     .query("tag", "a b")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.uri().query(), Some("count=3&tag=a%20b"));
/// assert_eq!(request.query_value("tag"), Some("a b"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TestRequest;

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new PATCH request.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Creates a new DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }
}

/// Builder for test requests.
///
/// Errors (a bad header, an unserializable body) are held until
/// [`build`](Self::build) so that calls can be chained.
#[must_use]
#[derive(Debug, Clone)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Bytes,
    error: Option<String>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Appends a query parameter, percent-encoding name and value.
    pub fn query(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.query
            .push((name.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Adds a header. Repeated names keep every value.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.headers
            .push((name.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(
            header::AUTHORIZATION.as_str(),
            format!("Bearer {}", token.as_ref()),
        )
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the body as JSON and the matching Content-Type.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Bytes::from(bytes),
            Err(e) => {
                self.error.get_or_insert_with(|| format!("JSON body: {e}"));
            }
        }
        self.content_type("application/json")
    }

    /// Sets the body as a URL-encoded form and the matching Content-Type.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => self.body = Bytes::from(encoded),
            Err(e) => {
                self.error.get_or_insert_with(|| format!("form body: {e}"));
            }
        }
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Returns the full URI, with query parameters added by
    /// [`query`](Self::query) appended to any already in the path.
    pub fn full_uri(&self) -> String {
        if self.query.is_empty() {
            return self.uri.clone();
        }

        let encoded = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.uri.contains('?') { '&' } else { '?' };
        format!("{}{separator}{encoded}", self.uri)
    }

    /// Builds the request.
    pub fn build(self) -> Result<ServerRequest, TestError> {
        if let Some(error) = self.error {
            return Err(TestError::RequestBuild(error));
        }

        let mut builder = ServerRequest::builder()
            .method(self.method.clone())
            .uri(self.full_uri());
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        builder
            .body(self.body)
            .build()
            .map_err(|e| TestError::RequestBuild(e.to_string()))
    }
}

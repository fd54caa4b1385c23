//! Abstract responses produced by the dispatch loop.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use std::borrow::Cow;

/// A response handed back to the HTTP adapter.
///
/// # Example
///
/// ```rust
/// use waypost_core::ServerResponse;
/// use http::StatusCode;
///
/// let response = ServerResponse::ok()
///     .with_content_type("text/plain")
///     .with_body("hello");
///
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.body_text(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ServerResponse {
    /// Creates an empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// An empty `200 OK`.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Replaces the status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Appends a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets `Content-Type`.
    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Converts into an `http::Response`.
    pub fn into_http(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for ServerResponse {
    fn default() -> Self {
        Self::ok()
    }
}

/// Result of running the dispatch loop over a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// An endpoint claimed the request, either by running its logic or by
    /// rejecting its inputs.
    Handled(ServerResponse),
    /// No endpoint claimed the request. The adapter decides what "not found"
    /// means.
    Unhandled,
}

impl DispatchResult {
    /// Returns `true` for [`DispatchResult::Handled`].
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    /// Returns the response, if handled.
    pub fn response(&self) -> Option<&ServerResponse> {
        match self {
            Self::Handled(response) => Some(response),
            Self::Unhandled => None,
        }
    }

    /// Consumes the result, returning the response if handled.
    pub fn into_response(self) -> Option<ServerResponse> {
        match self {
            Self::Handled(response) => Some(response),
            Self::Unhandled => None,
        }
    }

    /// Consumes the result, substituting `fallback` when unhandled.
    pub fn into_response_or(self, fallback: impl FnOnce() -> ServerResponse) -> ServerResponse {
        self.into_response().unwrap_or_else(fallback)
    }
}

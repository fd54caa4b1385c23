//! The abstract request seen by the decode pipeline.
//!
//! [`ServerRequest`] is what an HTTP adapter hands to the dispatcher. It is
//! immutable once built; per-endpoint state (the path captures of one
//! structural match) travels alongside it in a [`DecodeContext`].

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use waypost_router::Params;

/// An inbound request, independent of any transport.
///
/// The query string is parsed once at construction so that every endpoint
/// attempt reads the same pairs.
///
/// # Example
///
/// ```rust
/// use waypost_extract::ServerRequest;
/// use http::Method;
///
/// let req = ServerRequest::builder()
///     .method(Method::GET)
///     .uri("/echo?count=3&tag=a&tag=b")
///     .header("x-trace", "t-1")
///     .body("ab")
///     .build()
///     .unwrap();
///
/// assert_eq!(req.path(), "/echo");
/// assert_eq!(req.query_value("count"), Some("3"));
/// assert_eq!(req.query_values("tag").collect::<Vec<_>>(), vec!["a", "b"]);
/// assert_eq!(req.header("X-Trace"), Some("t-1"));
/// ```
#[derive(Debug, Clone)]
pub struct ServerRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    query: Vec<(String, String)>,
}

impl ServerRequest {
    /// Creates a request from its parts.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        let query = uri
            .query()
            .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
            .unwrap_or_default();

        Self {
            method,
            uri,
            headers,
            body,
            query,
        }
    }

    /// Starts a request builder.
    #[must_use]
    pub fn builder() -> ServerRequestBuilder {
        ServerRequestBuilder::new()
    }

    /// Converts an `http::Request` carrying a fully buffered body.
    #[must_use]
    pub fn from_http(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the raw query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the decoded query pairs in request order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the first value of a query parameter.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value of a query parameter.
    pub fn query_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the buffered body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// A request together with the captures of one structural match.
///
/// Built by the endpoint matcher for each candidate endpoint and handed to
/// every input decoder of that endpoint.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    request: &'a ServerRequest,
    path_params: &'a Params,
}

impl<'a> DecodeContext<'a> {
    /// Pairs a request with path captures.
    #[must_use]
    pub fn new(request: &'a ServerRequest, path_params: &'a Params) -> Self {
        Self {
            request,
            path_params,
        }
    }

    /// Returns the underlying request.
    #[must_use]
    pub fn request(&self) -> &'a ServerRequest {
        self.request
    }

    /// Returns the path captures.
    #[must_use]
    pub fn path_params(&self) -> &'a Params {
        self.path_params
    }
}

/// Error produced when a [`ServerRequestBuilder`] is incomplete or invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuildError(String);

impl std::fmt::Display for RequestBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid request: {}", self.0)
    }
}

impl std::error::Error for RequestBuildError {}

/// Builder for [`ServerRequest`].
#[derive(Debug, Default)]
pub struct ServerRequestBuilder {
    method: Option<Method>,
    uri: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    error: Option<String>,
}

impl ServerRequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method. Defaults to `GET`.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI (path plus optional query).
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Adds a header, keeping earlier values for the same name.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => {
                self.error.get_or_insert_with(|| format!("bad header {name}"));
            }
        }
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the request.
    pub fn build(self) -> Result<ServerRequest, RequestBuildError> {
        if let Some(error) = self.error {
            return Err(RequestBuildError(error));
        }
        let method = self.method.unwrap_or(Method::GET);
        let uri: Uri = self
            .uri
            .ok_or_else(|| RequestBuildError("uri is required".into()))?
            .parse()
            .map_err(|e: http::uri::InvalidUri| RequestBuildError(e.to_string()))?;

        Ok(ServerRequest::new(method, uri, self.headers, self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_parsed_once_and_decoded() {
        let req = ServerRequest::new(
            Method::GET,
            Uri::from_static("/search?q=rust+lang&limit=10&q=second"),
            HeaderMap::new(),
            Bytes::new(),
        );

        assert_eq!(req.query_value("q"), Some("rust lang"));
        assert_eq!(req.query_values("q").count(), 2);
        assert_eq!(req.query_value("limit"), Some("10"));
        assert_eq!(req.query_value("missing"), None);
        assert_eq!(req.query_pairs().len(), 3);
    }

    #[test]
    fn test_query_value_outlives_name() {
        let req = ServerRequest::builder().uri("/x?n=5&n=x").build().unwrap();
        let value = {
            let name = String::from("n");
            req.query_value(&name)
        };
        assert_eq!(value, Some("5"));
    }

    #[test]
    fn test_no_query_string() {
        let req = ServerRequest::new(Method::GET, Uri::from_static("/"), HeaderMap::new(), Bytes::new());
        assert!(req.query_string().is_none());
        assert!(req.query_pairs().is_empty());
    }

    #[test]
    fn test_builder_requires_uri() {
        let req = ServerRequest::builder().uri("/").build().unwrap();
        assert_eq!(*req.method(), Method::GET);
        assert!(ServerRequest::builder().method(Method::GET).build().is_err());
    }

    #[test]
    fn test_builder_rejects_bad_header() {
        let err = ServerRequest::builder()
            .method(Method::GET)
            .uri("/")
            .header("bad header", "v")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn test_from_http() {
        let http_req = http::Request::builder()
            .method(Method::POST)
            .uri("/items?id=4")
            .header("content-type", "application/json")
            .body(Bytes::from_static(b"{}"))
            .unwrap();

        let req = ServerRequest::from_http(http_req);
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.content_type(), Some("application/json"));
        assert_eq!(req.query_value("id"), Some("4"));
        assert_eq!(req.body().as_ref(), b"{}");
    }

    #[test]
    fn test_decode_context_exposes_both_halves() {
        let req = ServerRequest::builder()
            .method(Method::GET)
            .uri("/users/9")
            .build()
            .unwrap();
        let mut params = Params::new();
        params.push("id", "9");

        let ctx = DecodeContext::new(&req, &params);
        assert_eq!(ctx.request().path(), "/users/9");
        assert_eq!(ctx.path_params().get("id"), Some("9"));
    }
}

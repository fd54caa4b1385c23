//! In-memory client driving a [`Dispatcher`].

use crate::error::TestError;
use crate::request::{TestRequest, TestRequestBuilder};
use crate::response::TestResponse;
use bytes::Bytes;
use http::Method;
use std::sync::Arc;
use waypost_core::Dispatcher;

/// A client that sends requests straight into a dispatcher.
///
/// # Example
///
/// ```
/// use waypost_core::{Dispatcher, Endpoint};
/// use waypost_extract::{query, StringCodec};
/// use waypost_test::TestClient;
///
/// # tokio_test::block_on(async {
/// let hello = Endpoint::get("/hello")
///     .input(query::<String>("name"))
///     .output(StringCodec)
///     .server_logic_success(|(name,): (String,)| async move { format!("hello {name}") });
///
/// let client = TestClient::new(Dispatcher::new().endpoint(hello));
///
/// client
///     .get("/hello")
///     .query("name", "ada")
///     .send()
///     .await
///     .assert_status_code(200)
///     .assert_body_eq("hello ada");
///
/// client.get("/nowhere").send().await.assert_unhandled();
/// # });
/// ```
#[must_use]
pub struct TestClient {
    dispatcher: Arc<Dispatcher>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Creates a client over a dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::shared(Arc::new(dispatcher))
    }

    /// Creates a client over a dispatcher that is also used elsewhere.
    pub fn shared(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Creates a GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::get(uri))
    }

    /// Creates a POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::post(uri))
    }

    /// Creates a PUT request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::put(uri))
    }

    /// Creates a PATCH request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::patch(uri))
    }

    /// Creates a DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequest::delete(uri))
    }

    /// Creates a request with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        TestClientRequest::new(self, TestRequestBuilder::new(method, uri))
    }

    async fn send_internal(&self, builder: TestRequestBuilder) -> Result<TestResponse, TestError> {
        let request = builder.build()?;
        let result = self
            .dispatcher
            .dispatch(&request)
            .await
            .map_err(TestError::Fault)?;
        Ok(TestResponse::from_dispatch(result))
    }
}

/// A request builder bound to a test client.
#[must_use]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl<'a> TestClientRequest<'a> {
    fn new(client: &'a TestClient, builder: TestRequestBuilder) -> Self {
        let builder = client
            .default_headers
            .iter()
            .fold(builder, |b, (name, value)| b.header(name, value));
        Self { client, builder }
    }

    /// Appends a query parameter.
    pub fn query(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.query(name, value);
        self
    }

    /// Adds a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_token(token);
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or endpoint logic faults; use
    /// [`try_send`](Self::try_send) to observe either.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("test request failed: {e}"),
        }
    }

    /// Sends the request, returning build errors and logic faults.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        self.client.send_internal(self.builder).await
    }
}

//! Endpoints bound to logic, and the logic invoker.
//!
//! A [`ServerEndpoint`] owns an [`Endpoint`] and the async function serving
//! it. The function receives the decoded input tuple and answers with either
//! the success value or the declared error value; both are encoded with the
//! endpoint's codecs and given a status by its [`StatusMapping`].
//!
//! Faults are different from declared errors. Logic bound with
//! [`ServerEndpoint::fallible`] may fail with a [`LogicFault`], which is
//! handed back to the caller of the dispatcher untouched. Panics are not
//! caught either.
//!
//! [`StatusMapping`]: crate::StatusMapping

use crate::endpoint::{Endpoint, MatchOutcome};
use crate::response::ServerResponse;
use crate::status::DispatchDefaults;
use futures_util::future::BoxFuture;
use http::header::{HeaderValue, CONTENT_TYPE};
use std::fmt;
use std::future::Future;
use waypost_extract::{Codec, Inputs, ServerRequest};

/// A fault raised by logic, as opposed to a declared error value.
pub type LogicFault = anyhow::Error;

/// The boxed future returned by bound logic.
pub type LogicFuture<O, E> = BoxFuture<'static, Result<Result<O, E>, LogicFault>>;

/// A prepared call to an endpoint's logic. Nothing runs until it is awaited.
pub type Invocation<'a> = BoxFuture<'a, Result<ServerResponse, LogicFault>>;

type Logic<In, O, E> = Box<dyn Fn(In) -> LogicFuture<O, E> + Send + Sync>;

/// An endpoint bound to its logic.
///
/// # Example
///
/// ```rust
/// use waypost_core::{Endpoint, ServerEndpoint, DispatchDefaults, MatchOutcome};
/// use waypost_extract::{query, ServerRequest, StringCodec};
///
/// # tokio_test::block_on(async {
/// let hello = ServerEndpoint::new(
///     Endpoint::get("/hello").input(query::<String>("name")).output(StringCodec),
///     |(name,): (String,)| async move { Ok::<_, ()>(format!("hello {name}")) },
/// );
///
/// let request = ServerRequest::builder().uri("/hello?name=ada").build().unwrap();
/// let MatchOutcome::FullMatch(input) = hello.endpoint().match_request(&request) else {
///     unreachable!()
/// };
/// let response = hello.invoke(input, &DispatchDefaults::default()).await.unwrap();
/// assert_eq!(response.body_text(), "hello ada");
/// # });
/// ```
pub struct ServerEndpoint<I, O, E>
where
    I: Inputs,
    O: Codec,
    E: Codec,
{
    endpoint: Endpoint<I, O, E>,
    logic: Logic<I::Output, O::Value, E::Value>,
}

impl<I, O, E> ServerEndpoint<I, O, E>
where
    I: Inputs,
    O: Codec,
    O::Value: Send + 'static,
    E: Codec,
    E::Value: Send + 'static,
{
    /// Binds logic answering with a success or a declared error.
    pub fn new<F, Fut>(endpoint: Endpoint<I, O, E>, logic: F) -> Self
    where
        F: Fn(I::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O::Value, E::Value>> + Send + 'static,
    {
        Self {
            endpoint,
            logic: Box::new(move |input| {
                let fut = logic(input);
                Box::pin(async move { Ok(fut.await) })
            }),
        }
    }

    /// Binds logic that can also fault.
    ///
    /// The outer `Err` is a fault and propagates out of the dispatcher; the
    /// inner result is the endpoint's answer.
    pub fn fallible<F, Fut, X>(endpoint: Endpoint<I, O, E>, logic: F) -> Self
    where
        F: Fn(I::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Result<O::Value, E::Value>, X>> + Send + 'static,
        X: Into<LogicFault>,
    {
        Self {
            endpoint,
            logic: Box::new(move |input| {
                let fut = logic(input);
                Box::pin(async move { fut.await.map_err(Into::into) })
            }),
        }
    }

    /// Binds logic that always succeeds.
    pub fn success<F, Fut>(endpoint: Endpoint<I, O, E>, logic: F) -> Self
    where
        F: Fn(I::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O::Value> + Send + 'static,
    {
        Self::new(endpoint, move |input| {
            let fut = logic(input);
            async move { Ok(fut.await) }
        })
    }

    /// Returns the endpoint description.
    pub fn endpoint(&self) -> &Endpoint<I, O, E> {
        &self.endpoint
    }

    /// Runs the logic once with decoded inputs and builds the response.
    ///
    /// The success value is encoded with the output codec and the declared
    /// error with the error codec. A codec that cannot encode its value, or
    /// names a content type that is not a valid header value, is reported as
    /// a fault.
    pub async fn invoke(
        &self,
        input: I::Output,
        defaults: &DispatchDefaults,
    ) -> Result<ServerResponse, LogicFault> {
        let result = (self.logic)(input).await?;
        let status = self.endpoint.status().resolve(&result, defaults);

        let (body, content_type) = match &result {
            Ok(value) => {
                let codec = self.endpoint.output_codec();
                (codec.encode(value)?, codec.content_type())
            }
            Err(error) => {
                let codec = self.endpoint.error_codec();
                (codec.encode(error)?, codec.content_type())
            }
        };

        let mut response = ServerResponse::new(status);
        if !body.is_empty() {
            if let Some(content_type) = content_type {
                response = response.header(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
            }
        }
        Ok(response.with_body(body))
    }

    /// Erases the endpoint's types so it can share a list with others.
    pub fn boxed(self) -> BoxedEndpoint {
        Box::new(self)
    }
}

impl<I, O, E> fmt::Debug for ServerEndpoint<I, O, E>
where
    I: Inputs,
    O: Codec,
    E: Codec,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerEndpoint")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl<I, O, E> Endpoint<I, O, E>
where
    I: Inputs,
    O: Codec,
    O::Value: Send + 'static,
    E: Codec,
    E::Value: Send + 'static,
{
    /// Binds logic to this endpoint. Same as [`ServerEndpoint::new`].
    pub fn server_logic<F, Fut>(self, logic: F) -> ServerEndpoint<I, O, E>
    where
        F: Fn(I::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O::Value, E::Value>> + Send + 'static,
    {
        ServerEndpoint::new(self, logic)
    }

    /// Binds fallible logic. Same as [`ServerEndpoint::fallible`].
    pub fn server_logic_fallible<F, Fut, X>(self, logic: F) -> ServerEndpoint<I, O, E>
    where
        F: Fn(I::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Result<O::Value, E::Value>, X>> + Send + 'static,
        X: Into<LogicFault>,
    {
        ServerEndpoint::fallible(self, logic)
    }

    /// Binds logic that always succeeds. Same as [`ServerEndpoint::success`].
    pub fn server_logic_success<F, Fut>(self, logic: F) -> ServerEndpoint<I, O, E>
    where
        F: Fn(I::Output) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O::Value> + Send + 'static,
    {
        ServerEndpoint::success(self, logic)
    }
}

/// A server endpoint with its input and output types erased.
pub trait AnyEndpoint: Send + Sync + 'static {
    /// The endpoint's name, if set.
    fn operation_id(&self) -> Option<&str>;

    /// A one-line description of the endpoint.
    fn describe(&self) -> String;

    /// Matches the request and, on a full match, prepares the logic call.
    fn prepare<'a>(
        &'a self,
        request: &ServerRequest,
        defaults: &'a DispatchDefaults,
    ) -> MatchOutcome<Invocation<'a>>;
}

/// An owned, type-erased server endpoint.
pub type BoxedEndpoint = Box<dyn AnyEndpoint>;

impl<I, O, E> AnyEndpoint for ServerEndpoint<I, O, E>
where
    I: Inputs,
    O: Codec,
    O::Value: Send + 'static,
    E: Codec,
    E::Value: Send + 'static,
{
    fn operation_id(&self) -> Option<&str> {
        self.endpoint.operation_id()
    }

    fn describe(&self) -> String {
        self.endpoint.describe()
    }

    fn prepare<'a>(
        &'a self,
        request: &ServerRequest,
        defaults: &'a DispatchDefaults,
    ) -> MatchOutcome<Invocation<'a>> {
        self.endpoint
            .match_request(request)
            .map(|input| -> Invocation<'a> { Box::pin(self.invoke(input, defaults)) })
    }
}

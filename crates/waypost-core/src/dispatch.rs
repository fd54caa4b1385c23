//! The dispatch loop.
//!
//! Endpoints are tried in registration order. For each one:
//!
//! | Match result | Classification | Loop |
//! |--------------|----------------|------|
//! | structural mismatch | not consulted | next endpoint |
//! | partial failure | `NoMatch` | next endpoint |
//! | partial failure | `ErrorResponse` | stop, answer with the error |
//! | full match | not consulted | stop, run the logic |
//!
//! A full match ends the loop even when the logic answers with its declared
//! error. If every endpoint passes, the result is
//! [`DispatchResult::Unhandled`].

use crate::classifier::{ClassifiedOutcome, DecodeFailureHandler, DefaultDecodeFailureHandler};
use crate::endpoint::MatchOutcome;
use crate::response::DispatchResult;
use crate::server_endpoint::{AnyEndpoint, BoxedEndpoint, LogicFault};
use crate::status::DispatchDefaults;
use std::fmt;
use std::time::Instant;
use waypost_extract::ServerRequest;
use waypost_telemetry::metrics::{self, DispatchOutcome};
use waypost_telemetry::{
    log_dispatch_fault, log_dispatch_handled, log_dispatch_rejected, log_dispatch_unhandled,
};

const UNNAMED: &str = "<unnamed>";

/// An ordered, immutable-after-setup list of server endpoints plus the
/// policies used to dispatch over it.
///
/// A dispatcher holds no per-request state; share it behind an `Arc` and
/// call [`Dispatcher::dispatch`] concurrently.
///
/// # Example
///
/// ```rust
/// use waypost_core::{Dispatcher, DispatchResult, Endpoint};
/// use waypost_extract::{query, string_body, ServerRequest, StringCodec};
///
/// # tokio_test::block_on(async {
/// let dispatcher = Dispatcher::new().endpoint(
///     Endpoint::get("/echo")
///         .input(query::<usize>("count"))
///         .input(string_body())
///         .output(StringCodec)
///         .server_logic(|(count, body): (usize, String)| async move {
///             Ok::<_, ()>(body.repeat(count))
///         }),
/// );
///
/// let request = ServerRequest::builder().uri("/echo?count=3").body("ab").build().unwrap();
/// let result = dispatcher.dispatch(&request).await.unwrap();
/// assert_eq!(result.response().unwrap().body_text(), "ababab");
///
/// let request = ServerRequest::builder().uri("/other").build().unwrap();
/// assert_eq!(dispatcher.dispatch(&request).await.unwrap(), DispatchResult::Unhandled);
/// # });
/// ```
pub struct Dispatcher {
    endpoints: Vec<BoxedEndpoint>,
    handler: Box<dyn DecodeFailureHandler>,
    defaults: DispatchDefaults,
}

impl Dispatcher {
    /// An empty dispatcher with the default classifier and defaults.
    pub fn new() -> Self {
        Self {
            endpoints: Vec::new(),
            handler: Box::new(DefaultDecodeFailureHandler::default()),
            defaults: DispatchDefaults::default(),
        }
    }

    /// Appends a server endpoint.
    pub fn endpoint(mut self, endpoint: impl AnyEndpoint) -> Self {
        self.register(endpoint);
        self
    }

    /// Appends an already boxed server endpoint.
    pub fn boxed_endpoint(mut self, endpoint: BoxedEndpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Appends a server endpoint in place.
    pub fn register(&mut self, endpoint: impl AnyEndpoint) -> &mut Self {
        self.endpoints.push(Box::new(endpoint));
        self
    }

    /// Replaces the decode failure classifier.
    pub fn decode_failure_handler(mut self, handler: impl DecodeFailureHandler) -> Self {
        self.handler = Box::new(handler);
        self
    }

    /// Replaces the dispatch defaults.
    pub fn defaults(mut self, defaults: DispatchDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Returns the registered endpoints in order.
    pub fn endpoints(&self) -> &[BoxedEndpoint] {
        &self.endpoints
    }

    /// Returns the number of registered endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns `true` when no endpoint is registered.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Returns the dispatch defaults.
    pub fn dispatch_defaults(&self) -> &DispatchDefaults {
        &self.defaults
    }

    /// Runs the dispatch loop over a request.
    ///
    /// # Errors
    ///
    /// Returns the fault of the matched endpoint's logic, unchanged.
    pub async fn dispatch(&self, request: &ServerRequest) -> Result<DispatchResult, LogicFault> {
        dispatch_with(&self.endpoints, self.handler.as_ref(), &self.defaults, request).await
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let endpoints: Vec<String> = self.endpoints.iter().map(|e| e.describe()).collect();
        f.debug_struct("Dispatcher")
            .field("endpoints", &endpoints)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Runs the dispatch loop with the default classifier and defaults.
///
/// # Errors
///
/// Returns the fault of the matched endpoint's logic, unchanged.
pub async fn dispatch(
    endpoints: &[BoxedEndpoint],
    request: &ServerRequest,
) -> Result<DispatchResult, LogicFault> {
    dispatch_with(
        endpoints,
        &DefaultDecodeFailureHandler::default(),
        &DispatchDefaults::default(),
        request,
    )
    .await
}

/// Runs the dispatch loop with an explicit classifier and defaults.
///
/// # Errors
///
/// Returns the fault of the matched endpoint's logic, unchanged.
pub async fn dispatch_with(
    endpoints: &[BoxedEndpoint],
    handler: &dyn DecodeFailureHandler,
    defaults: &DispatchDefaults,
    request: &ServerRequest,
) -> Result<DispatchResult, LogicFault> {
    let start = Instant::now();

    for endpoint in endpoints {
        metrics::record_endpoint_attempt();
        let operation = endpoint.operation_id();
        let name = operation.unwrap_or(UNNAMED);

        let invocation = match endpoint.prepare(request, defaults) {
            MatchOutcome::StructuralMismatch => continue,
            MatchOutcome::PartialFailure(failure) => match handler.classify(&failure, request) {
                ClassifiedOutcome::NoMatch => {
                    tracing::debug!(
                        operation = name,
                        failure = %failure,
                        "Decode failure does not select endpoint, trying next"
                    );
                    continue;
                }
                ClassifiedOutcome::ErrorResponse(response) => {
                    if defaults.log_decode_failures {
                        log_dispatch_rejected!(
                            name,
                            request.method(),
                            request.path(),
                            response.status().as_u16(),
                            failure
                        );
                    }
                    metrics::record_decode_failure(
                        failure.input_source().as_str(),
                        failure.error_code(),
                    );
                    metrics::record_dispatch(operation, DispatchOutcome::Rejected, start.elapsed());
                    return Ok(DispatchResult::Handled(response));
                }
            },
            MatchOutcome::FullMatch(invocation) => invocation,
        };

        return match invocation.await {
            Ok(response) => {
                log_dispatch_handled!(
                    name,
                    request.method(),
                    request.path(),
                    response.status().as_u16()
                );
                metrics::record_dispatch(operation, DispatchOutcome::Handled, start.elapsed());
                Ok(DispatchResult::Handled(response))
            }
            Err(fault) => {
                log_dispatch_fault!(name, fault);
                metrics::record_dispatch(operation, DispatchOutcome::Fault, start.elapsed());
                Err(fault)
            }
        };
    }

    log_dispatch_unhandled!(request.method(), request.path());
    metrics::record_dispatch(None, DispatchOutcome::Unhandled, start.elapsed());
    Ok(DispatchResult::Unhandled)
}

//! Endpoint descriptions.
//!
//! An [`Endpoint`] states what a request must look like to be served: a
//! method, a path pattern, a tuple of typed inputs, and codecs for the
//! success and declared-error outputs. It carries no logic; binding logic
//! produces a [`ServerEndpoint`](crate::ServerEndpoint).
//!
//! # Example
//!
//! ```rust
//! use waypost_core::{Endpoint, MatchOutcome};
//! use waypost_extract::{query, string_body, ServerRequest, StringCodec};
//!
//! let echo = Endpoint::get("/echo")
//!     .input(query::<usize>("count"))
//!     .input(string_body())
//!     .output(StringCodec)
//!     .name("echo");
//!
//! assert_eq!(echo.describe(), "GET /echo ?count {body}");
//!
//! let request = ServerRequest::builder().uri("/echo?count=2").body("ab").build().unwrap();
//! match echo.match_request(&request) {
//!     MatchOutcome::FullMatch((count, body)) => assert_eq!(body.repeat(count), "abab"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use crate::status::StatusMapping;
use http::{Method, StatusCode};
use std::fmt;
use waypost_extract::{
    Append, Codec, DecodeContext, DecodeFailure, Input, InputSource, Inputs, ServerRequest,
    UnitCodec,
};
use waypost_router::{match_structure, EndpointMethod, PathPattern};

/// Result of matching one endpoint against a request.
#[derive(Debug)]
pub enum MatchOutcome<T> {
    /// Method, path and every declared input fit.
    FullMatch(T),
    /// Method and path fit; this is the first input that did not decode.
    PartialFailure(DecodeFailure),
    /// Method or path shape do not fit. No input was decoded.
    StructuralMismatch,
}

impl<T> MatchOutcome<T> {
    /// Maps the decoded value of a full match.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MatchOutcome<U> {
        match self {
            Self::FullMatch(value) => MatchOutcome::FullMatch(f(value)),
            Self::PartialFailure(failure) => MatchOutcome::PartialFailure(failure),
            Self::StructuralMismatch => MatchOutcome::StructuralMismatch,
        }
    }
}

/// An endpoint description.
///
/// `I` is the tuple of declared inputs, `O` the success-output codec and `E`
/// the declared-error codec. An endpoint without a declared error output
/// uses [`UnitCodec`], so its error value is `()` and its error body empty.
pub struct Endpoint<I = (), O = UnitCodec, E = UnitCodec>
where
    O: Codec,
    E: Codec,
{
    method: EndpointMethod,
    pattern: PathPattern,
    inputs: I,
    output: O,
    error_output: E,
    operation_id: Option<String>,
    status: StatusMapping<O::Value, E::Value>,
}

impl Endpoint {
    /// An endpoint for `method` at `pattern`, with no inputs yet.
    pub fn new(method: impl Into<EndpointMethod>, pattern: &str) -> Self {
        Self {
            method: method.into(),
            pattern: PathPattern::parse(pattern),
            inputs: (),
            output: UnitCodec,
            error_output: UnitCodec,
            operation_id: None,
            status: StatusMapping::default(),
        }
    }

    /// A `GET` endpoint.
    pub fn get(pattern: &str) -> Self {
        Self::new(Method::GET, pattern)
    }

    /// A `POST` endpoint.
    pub fn post(pattern: &str) -> Self {
        Self::new(Method::POST, pattern)
    }

    /// A `PUT` endpoint.
    pub fn put(pattern: &str) -> Self {
        Self::new(Method::PUT, pattern)
    }

    /// A `PATCH` endpoint.
    pub fn patch(pattern: &str) -> Self {
        Self::new(Method::PATCH, pattern)
    }

    /// A `DELETE` endpoint.
    pub fn delete(pattern: &str) -> Self {
        Self::new(Method::DELETE, pattern)
    }

    /// An endpoint accepting any method.
    pub fn any(pattern: &str) -> Self {
        Self::new(EndpointMethod::Any, pattern)
    }
}

impl<I, O, E> Endpoint<I, O, E>
where
    O: Codec,
    E: Codec,
{
    /// Declares one more input. Inputs keep their declaration order in the
    /// decoded tuple.
    pub fn input<J>(self, input: J) -> Endpoint<<I as Append<J>>::Output, O, E>
    where
        I: Append<J>,
        J: Input,
    {
        Endpoint {
            method: self.method,
            pattern: self.pattern,
            inputs: self.inputs.append(input),
            output: self.output,
            error_output: self.error_output,
            operation_id: self.operation_id,
            status: self.status,
        }
    }

    /// Declares the success output. Resets any status mapping.
    pub fn output<O2: Codec>(self, output: O2) -> Endpoint<I, O2, E> {
        Endpoint {
            method: self.method,
            pattern: self.pattern,
            inputs: self.inputs,
            output,
            error_output: self.error_output,
            operation_id: self.operation_id,
            status: StatusMapping::default(),
        }
    }

    /// Declares the error output. Resets any status mapping.
    pub fn error_output<E2: Codec>(self, error_output: E2) -> Endpoint<I, O, E2> {
        Endpoint {
            method: self.method,
            pattern: self.pattern,
            inputs: self.inputs,
            output: self.output,
            error_output,
            operation_id: self.operation_id,
            status: StatusMapping::default(),
        }
    }

    /// Names the endpoint. The name shows up in logs and metrics.
    pub fn name(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Fixes the status for successful results.
    pub fn success_status(mut self, status: StatusCode) -> Self {
        self.status = self.status.success(status);
        self
    }

    /// Fixes the status for declared errors.
    pub fn error_status(mut self, status: StatusCode) -> Self {
        self.status = self.status.error(status);
        self
    }

    /// Decides the status from the result itself.
    pub fn status_mapping(mut self, f: fn(&Result<O::Value, E::Value>) -> StatusCode) -> Self {
        self.status = StatusMapping::custom(f);
        self
    }

    /// Returns the method.
    pub fn method(&self) -> &EndpointMethod {
        &self.method
    }

    /// Returns the path pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Returns the declared inputs.
    pub fn inputs(&self) -> &I {
        &self.inputs
    }

    /// Returns the success-output codec.
    pub fn output_codec(&self) -> &O {
        &self.output
    }

    /// Returns the error-output codec.
    pub fn error_codec(&self) -> &E {
        &self.error_output
    }

    /// Returns the name, if set.
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Returns the status mapping.
    pub fn status(&self) -> &StatusMapping<O::Value, E::Value> {
        &self.status
    }
}

impl<I, O, E> Endpoint<I, O, E>
where
    I: Inputs,
    O: Codec,
    E: Codec,
{
    /// Matches the endpoint against a request.
    ///
    /// Method and path are checked first; inputs are only decoded when both
    /// fit, path first, then query, headers and body.
    pub fn match_request(&self, request: &ServerRequest) -> MatchOutcome<I::Output> {
        let Some(structural) =
            match_structure(&self.method, &self.pattern, request.method(), request.path())
        else {
            return MatchOutcome::StructuralMismatch;
        };

        let ctx = DecodeContext::new(request, &structural.params);
        match self.inputs.decode_all(&ctx) {
            Ok(decoded) => MatchOutcome::FullMatch(decoded),
            Err(failure) => MatchOutcome::PartialFailure(failure),
        }
    }

    /// A one-line human description, e.g. `GET /users/{id} ?verbose [x-token] {body}`.
    pub fn describe(&self) -> String {
        let mut out = format!("{} {}", self.method, self.pattern);
        for input in self.inputs.describe() {
            let name = input.name.as_deref().unwrap_or("");
            match input.source {
                InputSource::Path => {}
                InputSource::Query if name.is_empty() => out.push_str(" ?*"),
                InputSource::Query => {
                    out.push_str(" ?");
                    out.push_str(name);
                }
                InputSource::Header => {
                    out.push_str(" [");
                    out.push_str(name);
                    out.push(']');
                }
                InputSource::Body => out.push_str(" {body}"),
            }
        }
        out
    }
}

impl<I, O, E> fmt::Debug for Endpoint<I, O, E>
where
    O: Codec,
    E: Codec,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("pattern", &self.pattern.to_string())
            .field("operation_id", &self.operation_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypost_extract::{header, path, query, string_body, FailureKind, JsonCodec};

    fn get(uri: &str) -> ServerRequest {
        ServerRequest::builder().uri(uri).build().unwrap()
    }

    #[test]
    fn test_method_mismatch_is_structural() {
        let endpoint = Endpoint::post("/echo").input(query::<u32>("count"));
        assert!(matches!(
            endpoint.match_request(&get("/echo?count=x")),
            MatchOutcome::StructuralMismatch
        ));
    }

    #[test]
    fn test_path_mismatch_is_structural() {
        let endpoint = Endpoint::get("/users/{id}").input(path::<u32>("id"));
        assert!(matches!(
            endpoint.match_request(&get("/orders/1")),
            MatchOutcome::StructuralMismatch
        ));
        assert!(matches!(
            endpoint.match_request(&get("/users/1/extra")),
            MatchOutcome::StructuralMismatch
        ));
    }

    #[test]
    fn test_any_method() {
        let endpoint = Endpoint::any("/ping");
        let request = ServerRequest::builder()
            .method(Method::DELETE)
            .uri("/ping")
            .build()
            .unwrap();
        assert!(matches!(
            endpoint.match_request(&request),
            MatchOutcome::FullMatch(())
        ));
    }

    #[test]
    fn test_empty_capture_is_missing() {
        let endpoint = Endpoint::get("/users/{id}").input(path::<u32>("id"));
        match endpoint.match_request(&get("/users/")) {
            MatchOutcome::PartialFailure(failure) => {
                assert_eq!(failure.kind(), &FailureKind::Missing);
                assert_eq!(failure.input_source(), InputSource::Path);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_first_failure_in_stage_order() {
        let endpoint = Endpoint::get("/items")
            .input(string_body())
            .input(header::<u32>("x-page"))
            .input(query::<u32>("limit"));

        let request = ServerRequest::builder()
            .uri("/items?limit=ten")
            .header("x-page", "two")
            .build()
            .unwrap();

        match endpoint.match_request(&request) {
            MatchOutcome::PartialFailure(failure) => {
                assert_eq!(failure.input_source(), InputSource::Query);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_full_match_keeps_declaration_order() {
        let endpoint = Endpoint::get("/users/{id}")
            .input(query::<bool>("verbose"))
            .input(path::<u32>("id"));

        match endpoint.match_request(&get("/users/9?verbose=true")) {
            MatchOutcome::FullMatch((verbose, id)) => {
                assert!(verbose);
                assert_eq!(id, 9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_describe() {
        let endpoint = Endpoint::put("/users/{id}")
            .input(path::<u32>("id"))
            .input(header::<String>("X-Token"))
            .input(query::<bool>("dry_run").optional())
            .input(string_body())
            .output(JsonCodec::<serde_json::Value>::new())
            .name("updateUser");

        assert_eq!(
            endpoint.describe(),
            "PUT /users/{id} [x-token] ?dry_run {body}"
        );
        assert_eq!(endpoint.operation_id(), Some("updateUser"));
        assert_eq!(Endpoint::any("/").describe(), "ANY /");
    }

    #[test]
    fn test_output_resets_status_mapping() {
        let endpoint = Endpoint::get("/").success_status(StatusCode::CREATED);
        let defaults = crate::DispatchDefaults::default();
        assert_eq!(
            endpoint.status().resolve(&Ok(()), &defaults),
            StatusCode::CREATED
        );

        let endpoint = endpoint.output(waypost_extract::StringCodec);
        assert_eq!(
            endpoint.status().resolve(&Ok(String::new()), &defaults),
            StatusCode::OK
        );
    }
}

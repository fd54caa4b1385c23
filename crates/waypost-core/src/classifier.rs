//! Decode failure classification.
//!
//! When an endpoint's method and path fit a request but one of its inputs
//! fails to decode, a [`DecodeFailureHandler`] decides what that means:
//!
//! - [`ClassifiedOutcome::NoMatch`]: the request was not meant for this
//!   endpoint, try the next one.
//! - [`ClassifiedOutcome::ErrorResponse`]: the request belongs here but its
//!   input is bad. Dispatch stops with this response.
//!
//! The handler only ever sees the first failure of an endpoint.

use crate::response::ServerResponse;
use http::StatusCode;
use waypost_extract::{DecodeFailure, FailureKind, InputSource, ServerRequest};

/// Outcome of classifying a decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedOutcome {
    /// Fall through to the next endpoint.
    NoMatch,
    /// Stop dispatching and answer with this response.
    ErrorResponse(ServerResponse),
}

impl ClassifiedOutcome {
    /// An error response with a status and a plain-text body.
    pub fn error(status: StatusCode, body: impl Into<bytes::Bytes>) -> Self {
        Self::ErrorResponse(
            ServerResponse::new(status)
                .with_content_type("text/plain; charset=utf-8")
                .with_body(body),
        )
    }

    /// Returns `true` for [`ClassifiedOutcome::NoMatch`].
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }
}

/// Policy turning a decode failure into a [`ClassifiedOutcome`].
///
/// Closures with the matching signature implement this trait:
///
/// ```rust
/// use waypost_core::{ClassifiedOutcome, DecodeFailureHandler};
/// use waypost_extract::{DecodeFailure, InputSource, ServerRequest};
/// use http::StatusCode;
///
/// let strict = |failure: &DecodeFailure, _req: &ServerRequest| {
///     ClassifiedOutcome::error(StatusCode::UNPROCESSABLE_ENTITY, failure.to_string())
/// };
///
/// let request = ServerRequest::builder().uri("/").build().unwrap();
/// let failure = DecodeFailure::missing(InputSource::Query, "q");
/// assert!(!strict.classify(&failure, &request).is_no_match());
/// ```
pub trait DecodeFailureHandler: Send + Sync + 'static {
    /// Classifies the first decode failure of an endpoint.
    fn classify(&self, failure: &DecodeFailure, request: &ServerRequest) -> ClassifiedOutcome;
}

impl<F> DecodeFailureHandler for F
where
    F: Fn(&DecodeFailure, &ServerRequest) -> ClassifiedOutcome + Send + Sync + 'static,
{
    fn classify(&self, failure: &DecodeFailure, request: &ServerRequest) -> ClassifiedOutcome {
        self(failure, request)
    }
}

/// How the default handler renders an error body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureBody {
    /// The failure's message as plain text.
    #[default]
    Plain,
    /// A JSON object with `code`, `message`, `source` and `input`.
    Json,
    /// No body.
    Empty,
}

/// Returns `true` when a failure means "this path shape does not apply".
///
/// That is the case for a path input whose capture is empty or is not part
/// of the pattern at all.
pub fn is_path_shape_failure(failure: &DecodeFailure) -> bool {
    match failure.kind() {
        FailureKind::PathMismatch => true,
        FailureKind::Missing => failure.input_source() == InputSource::Path,
        FailureKind::Malformed(_) => false,
    }
}

/// The stock classification policy.
///
/// Path-shape failures fall through; every other failure is answered with
/// `status` (400 unless configured otherwise).
///
/// ```rust
/// use waypost_core::{ClassifiedOutcome, DecodeFailureHandler, DefaultDecodeFailureHandler};
/// use waypost_extract::{DecodeFailure, InputSource, ServerRequest};
///
/// let handler = DefaultDecodeFailureHandler::default();
/// let request = ServerRequest::builder().uri("/users/").build().unwrap();
///
/// let missing_capture = DecodeFailure::missing(InputSource::Path, "id");
/// assert_eq!(handler.classify(&missing_capture, &request), ClassifiedOutcome::NoMatch);
///
/// let missing_query = DecodeFailure::missing(InputSource::Query, "limit");
/// match handler.classify(&missing_query, &request) {
///     ClassifiedOutcome::ErrorResponse(response) => assert_eq!(response.status(), 400),
///     ClassifiedOutcome::NoMatch => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultDecodeFailureHandler {
    status: StatusCode,
    body: FailureBody,
}

impl DefaultDecodeFailureHandler {
    /// Creates the handler with status 400 and a plain-text body.
    pub fn new() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: FailureBody::Plain,
        }
    }

    /// Sets the status used for error responses.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Sets the body format.
    pub fn with_body(mut self, body: FailureBody) -> Self {
        self.body = body;
        self
    }

    /// Returns the status used for error responses.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn render(&self, failure: &DecodeFailure) -> ServerResponse {
        let response = ServerResponse::new(self.status);
        match self.body {
            FailureBody::Plain => response
                .with_content_type("text/plain; charset=utf-8")
                .with_body(failure.to_string()),
            FailureBody::Json => {
                let body = serde_json::json!({
                    "code": failure.error_code(),
                    "message": failure.to_string(),
                    "source": failure.input_source().as_str(),
                    "input": failure.input(),
                });
                response
                    .with_content_type("application/json")
                    .with_body(body.to_string())
            }
            FailureBody::Empty => response,
        }
    }
}

impl Default for DefaultDecodeFailureHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeFailureHandler for DefaultDecodeFailureHandler {
    fn classify(&self, failure: &DecodeFailure, _request: &ServerRequest) -> ClassifiedOutcome {
        if is_path_shape_failure(failure) {
            ClassifiedOutcome::NoMatch
        } else {
            ClassifiedOutcome::ErrorResponse(self.render(failure))
        }
    }
}

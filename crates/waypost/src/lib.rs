//! # Waypost
//!
//! **Typed endpoint dispatch with decode-failure fallthrough**
//!
//! Waypost takes an ordered list of endpoints, each a method, a path shape,
//! typed inputs and async logic, and routes a request to the first one that
//! can decode it:
//!
//! - A request whose method or path shape does not fit an endpoint moves on
//!   to the next one
//! - A request that fits but carries a bad input is answered with a client
//!   error by that endpoint, and no later endpoint is consulted
//! - The decision between the two is a replaceable [`DecodeFailureHandler`]
//!
//! ## Quick Start
//!
//! ```rust
//! use waypost::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let echo = Endpoint::get("/echo")
//!     .input(query::<usize>("count"))
//!     .input(string_body())
//!     .output(StringCodec)
//!     .server_logic_success(|(count, body): (usize, String)| async move { body.repeat(count) });
//!
//! let dispatcher = Dispatcher::new().endpoint(echo);
//!
//! let request = ServerRequest::builder()
//!     .uri("/echo?count=3")
//!     .body("ab")
//!     .build()
//!     .unwrap();
//!
//! let result = dispatcher.dispatch(&request).await.unwrap();
//! assert_eq!(result.response().unwrap().body_text(), "ababab");
//! # });
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request ─▶ for each endpoint, in registration order:
//!              method + path shape ──no──▶ next endpoint
//!                    │ yes
//!              decode path, query, header, body (stop at first failure)
//!                    │ failure ──▶ classifier ──NoMatch──▶ next endpoint
//!                    │                  └─ErrorResponse──▶ respond
//!                    │ all decoded
//!              logic ─▶ status mapping + codec ─▶ respond
//!           exhausted ─▶ Unhandled
//! ```

#![doc(html_root_url = "https://docs.rs/waypost/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod setup;

// Re-export core types
pub use waypost_core as core;

// Re-export path matching types
pub use waypost_router as router;

// Re-export inputs, codecs and requests
pub use waypost_extract as extract;

// Re-export logging and metrics
pub use waypost_telemetry as telemetry;

// Re-export configuration
pub use waypost_config as config;

pub use setup::{
    defaults_from_config, dispatcher_from_config, failure_handler_from_config, init_telemetry,
};

#[doc(no_inline)]
pub use waypost_core::DecodeFailureHandler;

/// Prelude module for convenient imports.
///
/// ```rust
/// use waypost::prelude::*;
///
/// let endpoint = Endpoint::get("/users/{id}").input(path::<u64>("id"));
/// assert_eq!(endpoint.describe(), "GET /users/{id}");
/// ```
pub mod prelude {
    pub use waypost_core::{
        and_then_first, and_then_first_either, dispatch, dispatch_with, ClassifiedOutcome,
        DecodeFailureHandler, DefaultDecodeFailureHandler, DispatchDefaults, DispatchResult,
        Dispatcher, Endpoint, FailureBody, LogicFault, ServerEndpoint, ServerResponse,
        StatusMapping,
    };

    pub use waypost_extract::{
        body, bytes_body, header, header_with, json_body, path, path_with, query, query_all,
        query_struct, query_with, string_body, BodyInput, BytesCodec, Codec, CodecError,
        DecodeFailure, FailureKind, FormCodec, FromStrCodec, HeaderInput, Input, InputSource,
        JsonCodec, PathInput, QueryInput, ServerRequest, StringCodec, UnitCodec,
    };

    pub use http::{Method, StatusCode};
}

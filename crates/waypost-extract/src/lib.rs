//! # Waypost Extract
//!
//! Typed endpoint inputs for waypost.
//!
//! An endpoint declares what it needs from a request as a tuple of
//! [`Input`]s. Each input names a source and a [`Codec`]; decoding produces
//! either the typed value or a [`DecodeFailure`] that says which input
//! failed and how.
//!
//! ## Inputs
//!
//! | Constructor | Source | Output |
//! |-------------|--------|--------|
//! | [`path`] / [`path_with`] | path capture | `T` |
//! | [`query`] / [`query_with`] | query parameter | `T` |
//! | [`query_all`] | repeated query parameter | `Vec<T>` |
//! | [`query_struct`] | whole query string | `T: Deserialize` |
//! | [`header`] / [`header_with`] | header | `T` |
//! | [`body`], [`string_body`], [`bytes_body`], [`json_body`] | body | codec value |
//!
//! ## Decode Order
//!
//! A tuple of inputs is decoded path first, then query, then headers, then
//! the body, stopping at the first failure:
//!
//! ```rust
//! use waypost_extract::{json_body, query, DecodeContext, Inputs, InputSource, Params, ServerRequest};
//!
//! let request = ServerRequest::builder()
//!     .uri("/things?limit=many")
//!     .body("{not json")
//!     .build()
//!     .unwrap();
//! let params = Params::new();
//! let ctx = DecodeContext::new(&request, &params);
//!
//! let inputs = (json_body::<serde_json::Value>(), query::<u32>("limit"));
//! let failure = inputs.decode_all(&ctx).unwrap_err();
//!
//! assert_eq!(failure.input_source(), InputSource::Query);
//! assert_eq!(failure.error_code(), "INVALID_INPUT");
//! ```
//!
//! ## Failures
//!
//! | Kind | Meaning |
//! |------|---------|
//! | [`FailureKind::Missing`] | required input absent, or path capture empty |
//! | [`FailureKind::Malformed`] | present but rejected by the codec |
//! | [`FailureKind::PathMismatch`] | path input names no capture of the pattern |

#![doc(html_root_url = "https://docs.rs/waypost-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod codec;
mod error;
mod input;
mod inputs;
mod request;

pub use codec::{BytesCodec, Codec, FormCodec, FromStrCodec, JsonCodec, StringCodec, UnitCodec};
pub use error::{CodecError, DecodeFailure, FailureKind, InputSource};
pub use input::{
    body, bytes_body, header, header_with, json_body, path, path_with, query, query_all,
    query_struct, query_with, string_body, BodyInput, HeaderInput, Input, Optional, PathInput,
    QueryAllInput, QueryInput, QueryStructInput,
};
pub use inputs::{Append, InputDescriptor, Inputs};
pub use request::{DecodeContext, RequestBuildError, ServerRequest, ServerRequestBuilder};

// Re-export useful types from dependencies
pub use waypost_router::{Capture, Params};

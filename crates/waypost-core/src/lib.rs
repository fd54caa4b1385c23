//! # Waypost Core
//!
//! Endpoint descriptions, decode failure classification and the dispatch
//! loop.
//!
//! This crate provides:
//!
//! - [`Endpoint`] - Method, path pattern, typed inputs and output codecs
//! - [`ServerEndpoint`] - An endpoint bound to its async logic
//! - [`DecodeFailureHandler`] - Policy deciding between "try the next
//!   endpoint" and "answer with a client error"
//! - [`Dispatcher`] / [`dispatch`] - The fallthrough loop over an ordered
//!   endpoint list
//! - [`StatusMapping`] - Status codes for success and declared errors
//! - [`and_then_first`] / [`and_then_first_either`] - Splice a one-argument
//!   step (e.g., authentication) in front of the logic

#![doc(html_root_url = "https://docs.rs/waypost-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod classifier;
pub mod compose;
mod dispatch;
mod endpoint;
mod response;
mod server_endpoint;
mod status;

pub use classifier::{
    is_path_shape_failure, ClassifiedOutcome, DecodeFailureHandler, DefaultDecodeFailureHandler,
    FailureBody,
};
pub use compose::{and_then_first, and_then_first_either, AndThenFirst, AndThenFirstEither};
pub use dispatch::{dispatch, dispatch_with, Dispatcher};
pub use endpoint::{Endpoint, MatchOutcome};
pub use response::{DispatchResult, ServerResponse};
pub use server_endpoint::{
    AnyEndpoint, BoxedEndpoint, Invocation, LogicFault, LogicFuture, ServerEndpoint,
};
pub use status::{DispatchDefaults, StatusMapping};

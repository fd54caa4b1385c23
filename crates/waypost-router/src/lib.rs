//! Structural matching for waypost endpoints.
//!
//! This crate answers the cheapest question the dispatcher asks about an
//! endpoint: does the request's method and path *shape* correspond to it at
//! all? Nothing here decodes typed values; captured segments come back as raw
//! strings in [`Params`] for the input decoders to interpret.
//!
//! # Path Patterns
//!
//! Patterns use the same brace syntax as OpenAPI paths:
//!
//! | Segment | Kind | Matches |
//! |---------|------|---------|
//! | `users` | Literal | exactly `users` |
//! | `{id}` | Capture | any single segment, recorded as `id` |
//! | `*rest` | Wildcard | the remainder of the path (final position only) |
//!
//! # Example
//!
//! ```rust
//! use waypost_router::{EndpointMethod, PathPattern};
//! use http::Method;
//!
//! let pattern = PathPattern::parse("/users/{id}/files/*path");
//! let params = pattern.match_path("/users/42/files/a/b.txt").unwrap();
//!
//! assert_eq!(params.get("id"), Some("42"));
//! assert_eq!(params.get("path"), Some("a/b.txt"));
//!
//! assert!(EndpointMethod::Any.matches(&Method::DELETE));
//! assert!(!EndpointMethod::from(Method::GET).matches(&Method::POST));
//! ```

#![doc(html_root_url = "https://docs.rs/waypost-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod method;
mod params;
mod pattern;

pub use method::EndpointMethod;
pub use params::{Capture, Params};
pub use pattern::{PathPattern, Segment};

/// Result of a structural match: the method fit and the path aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralMatch {
    /// Raw captured segments, in pattern order.
    pub params: Params,
}

/// Tests method and path shape together.
///
/// Returns `None` for a structural mismatch. The method is checked first so a
/// wrong method never pays for path splitting.
#[must_use]
pub fn match_structure(
    method: &EndpointMethod,
    pattern: &PathPattern,
    request_method: &http::Method,
    request_path: &str,
) -> Option<StructuralMatch> {
    if !method.matches(request_method) {
        return None;
    }
    pattern
        .match_path(request_path)
        .map(|params| StructuralMatch { params })
}

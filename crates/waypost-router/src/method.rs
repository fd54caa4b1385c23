//! Method matching for a single endpoint.

use http::Method;
use std::fmt;

/// The HTTP method an endpoint is declared for.
///
/// Unlike a method table, an endpoint binds to exactly one method or to any
/// method at all.
///
/// # Example
///
/// ```rust
/// use waypost_router::EndpointMethod;
/// use http::Method;
///
/// let get = EndpointMethod::from(Method::GET);
/// assert!(get.matches(&Method::GET));
/// assert!(!get.matches(&Method::HEAD));
///
/// assert!(EndpointMethod::Any.matches(&Method::PATCH));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EndpointMethod {
    /// Matches every request method.
    #[default]
    Any,
    /// Matches only the given method.
    Only(Method),
}

impl EndpointMethod {
    /// Returns true if a request with `method` fits this declaration.
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(expected) => expected == method,
        }
    }

    /// Returns the declared method, or `None` for [`EndpointMethod::Any`].
    #[must_use]
    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Self::Any => None,
            Self::Only(method) => Some(method),
        }
    }
}

impl From<Method> for EndpointMethod {
    fn from(method: Method) -> Self {
        Self::Only(method)
    }
}

impl fmt::Display for EndpointMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "ANY"),
            Self::Only(method) => write!(f, "{method}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_matches_exact_method() {
        let m = EndpointMethod::from(Method::POST);
        assert!(m.matches(&Method::POST));
        assert!(!m.matches(&Method::GET));
        assert_eq!(m.as_method(), Some(&Method::POST));
    }

    #[test]
    fn test_any_matches_all_standard_methods() {
        for method in [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::HEAD,
            Method::OPTIONS,
            Method::TRACE,
            Method::CONNECT,
        ] {
            assert!(EndpointMethod::Any.matches(&method));
        }
        assert_eq!(EndpointMethod::Any.as_method(), None);
    }

    #[test]
    fn test_extension_method() {
        let purge = Method::from_bytes(b"PURGE").unwrap();
        let m = EndpointMethod::from(purge.clone());
        assert!(m.matches(&purge));
        assert!(!m.matches(&Method::DELETE));
    }

    #[test]
    fn test_display() {
        assert_eq!(EndpointMethod::Any.to_string(), "ANY");
        assert_eq!(EndpointMethod::from(Method::GET).to_string(), "GET");
    }
}

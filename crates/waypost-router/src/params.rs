//! Captured path segments.

use smallvec::SmallVec;

// Patterns rarely carry more than a few captures.
const INLINE_CAPTURES: usize = 4;

/// What a pattern captured under one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture<'a> {
    /// The pattern has no capture by that name.
    NotInPattern,
    /// The capture position was present in the URL but held nothing, as in
    /// `/users/` against `/users/{id}`, or `/files` against `/files/*rest`.
    Empty,
    /// A percent-decoded, non-empty value.
    Value(&'a str),
}

/// Path captures produced by a structural match, in pattern order.
///
/// # Example
///
/// ```rust
/// use waypost_router::{Capture, PathPattern};
///
/// let params = PathPattern::parse("/orgs/{org}/users/{user}")
///     .match_path("/orgs/acme/users/")
///     .unwrap();
///
/// assert_eq!(params.capture("org"), Capture::Value("acme"));
/// assert_eq!(params.capture("user"), Capture::Empty);
/// assert_eq!(params.capture("team"), Capture::NotInPattern);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    captures: SmallVec<[(String, String); INLINE_CAPTURES]>,
}

impl Params {
    /// No captures, as for a pattern without parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Room for one capture per pattern segment.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            captures: SmallVec::with_capacity(capacity),
        }
    }

    /// Records a capture. The first capture under a name shadows later ones.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.captures.push((name.into(), value.into()));
    }

    /// Returns the raw value captured under `name`, empty values included.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Classifies the capture under `name`.
    #[must_use]
    pub fn capture(&self, name: &str) -> Capture<'_> {
        match self.get(name) {
            None => Capture::NotInPattern,
            Some("") => Capture::Empty,
            Some(value) => Capture::Value(value),
        }
    }

    /// Number of captures recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.len()
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            captures: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_captures() {
        let params = Params::new();
        assert_eq!(params.len(), 0);
        assert_eq!(params.capture("id"), Capture::NotInPattern);
    }

    #[test]
    fn test_first_capture_shadows_duplicates() {
        let mut params = Params::new();
        params.push("id", "1");
        params.push("id", "2");

        assert_eq!(params.capture("id"), Capture::Value("1"));
    }

    #[test]
    fn test_empty_capture_is_not_absent() {
        let mut params = Params::with_capacity(1);
        params.push("id", "");

        assert_eq!(params.get("id"), Some(""));
        assert_eq!(params.capture("id"), Capture::Empty);
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let params: Params = (0..10)
            .map(|i| (format!("p{i}"), i.to_string()))
            .collect();

        assert_eq!(params.len(), 10);
        assert_eq!(params.capture("p9"), Capture::Value("9"));
    }
}

//! Path patterns and structural path matching.

use crate::params::Params;
use std::borrow::Cow;
use std::fmt;

/// One segment of a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Aligns with any single request segment and records it under a name.
    Capture(String),
    /// Absorbs every remaining request segment. Only ever the last segment.
    Wildcard(String),
}

/// An ordered path shape such as `/users/{id}/files/*path`.
///
/// Parsing never fails: a `{name}` segment is a capture, a `*name` segment in
/// final position is a wildcard, and everything else (including a `*`
/// segment that is not last, or `{}`) is a literal.
///
/// # Matching
///
/// - literal segments must be equal after percent-decoding
/// - a capture needs a segment to be present, but the segment may be empty
/// - a wildcard takes the rest of the path, possibly nothing
/// - a single trailing slash on the request is tolerated
///
/// # Example
///
/// ```rust
/// use waypost_router::PathPattern;
///
/// let pattern = PathPattern::parse("/orgs/{org}/users/{user}");
///
/// let params = pattern.match_path("/orgs/acme/users/bob").unwrap();
/// assert_eq!(params.get("org"), Some("acme"));
/// assert_eq!(params.get("user"), Some("bob"));
///
/// assert!(pattern.match_path("/orgs/acme").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parses a pattern string.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let raw: Vec<&str> = split_segments(pattern).collect();
        let last = raw.len().saturating_sub(1);

        let segments = raw
            .iter()
            .enumerate()
            .map(|(i, seg)| classify_segment(seg, i == last))
            .collect();

        Self { segments }
    }

    /// Builds a pattern from already classified segments.
    ///
    /// A wildcard anywhere but the end is demoted to a literal of the same
    /// text, matching what [`PathPattern::parse`] would have produced.
    #[must_use]
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut segments: Vec<Segment> = segments.into_iter().collect();
        let last = segments.len().saturating_sub(1);
        for (i, seg) in segments.iter_mut().enumerate() {
            if i != last {
                if let Segment::Wildcard(name) = seg {
                    let literal = format!("*{name}");
                    *seg = Segment::Literal(literal);
                }
            }
        }
        Self { segments }
    }

    /// Returns the pattern's segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the names of captures and the wildcard, in order.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Capture(name) | Segment::Wildcard(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Returns true if the pattern ends in a wildcard.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard(_)))
    }

    /// Aligns a request path (without query string) against the pattern.
    ///
    /// Returns `None` when the shapes do not correspond. Runs in time linear
    /// in the number of path segments.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let request: Vec<&str> = split_segments(path).collect();
        let mut params = Params::with_capacity(self.segments.len());
        let mut idx = 0;

        for seg in &self.segments {
            match seg {
                Segment::Literal(expected) => {
                    let actual = request.get(idx)?;
                    if decode_segment(actual) != expected.as_str() {
                        return None;
                    }
                    idx += 1;
                }
                Segment::Capture(name) => {
                    let actual = request.get(idx)?;
                    params.push(name.as_str(), decode_segment(actual));
                    idx += 1;
                }
                Segment::Wildcard(name) => {
                    let rest = request.get(idx..).unwrap_or_default();
                    let joined = rest
                        .iter()
                        .map(|s| decode_segment(s))
                        .collect::<Vec<_>>()
                        .join("/");
                    params.push(name.as_str(), joined);
                    return Some(params);
                }
            }
        }

        match request.get(idx..) {
            Some([]) | Some([""]) | None => Some(params),
            Some(_) => None,
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for seg in &self.segments {
            match seg {
                Segment::Literal(lit) => write!(f, "/{lit}")?,
                Segment::Capture(name) => write!(f, "/{{{name}}}")?,
                Segment::Wildcard(name) => write!(f, "/*{name}")?,
            }
        }
        Ok(())
    }
}

impl From<&str> for PathPattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

// "/" and "" both mean the root; a leading slash is optional
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let root = trimmed.is_empty();
    trimmed.split('/').filter(move |_| !root)
}

fn classify_segment(seg: &str, is_last: bool) -> Segment {
    if let Some(name) = seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        if !name.is_empty() {
            return Segment::Capture(name.to_string());
        }
    }
    if is_last {
        if let Some(name) = seg.strip_prefix('*') {
            if !name.is_empty() {
                return Segment::Wildcard(name.to_string());
            }
        }
    }
    Segment::Literal(seg.to_string())
}

fn decode_segment(seg: &str) -> Cow<'_, str> {
    urlencoding::decode(seg).unwrap_or(Cow::Borrowed(seg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_segments() {
        let pattern = PathPattern::parse("/users/{id}/files/*path");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("users".into()),
                Segment::Capture("id".into()),
                Segment::Literal("files".into()),
                Segment::Wildcard("path".into()),
            ]
        );
        assert!(pattern.has_wildcard());
        assert_eq!(pattern.capture_names().collect::<Vec<_>>(), vec!["id", "path"]);
    }

    #[test]
    fn test_parse_demotes_inner_wildcard_and_empty_braces() {
        let pattern = PathPattern::parse("/a/*b/{}");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("a".into()),
                Segment::Literal("*b".into()),
                Segment::Literal("{}".into()),
            ]
        );
    }

    #[test]
    fn test_from_segments_demotes_inner_wildcard() {
        let pattern = PathPattern::from_segments([
            Segment::Wildcard("x".into()),
            Segment::Literal("y".into()),
        ]);
        assert_eq!(pattern.segments()[0], Segment::Literal("*x".into()));
    }

    #[test]
    fn test_root() {
        let pattern = PathPattern::parse("/");
        assert!(pattern.segments().is_empty());
        assert!(pattern.match_path("/").is_some());
        assert!(pattern.match_path("").is_some());
        assert!(pattern.match_path("/x").is_none());
        assert_eq!(pattern.to_string(), "/");
    }

    #[test]
    fn test_literal_match_and_mismatch() {
        let pattern = PathPattern::parse("/echo");
        assert!(pattern.match_path("/echo").is_some());
        assert!(pattern.match_path("/echo/").is_some());
        assert!(pattern.match_path("/echoes").is_none());
        assert!(pattern.match_path("/echo/more").is_none());
    }

    #[test]
    fn test_capture_requires_segment_presence() {
        let pattern = PathPattern::parse("/users/{id}");
        assert!(pattern.match_path("/users").is_none());

        let params = pattern.match_path("/users/").unwrap();
        assert_eq!(params.get("id"), Some(""));
    }

    #[test]
    fn test_capture_is_percent_decoded() {
        let pattern = PathPattern::parse("/tags/{name}");
        let params = pattern.match_path("/tags/rust%20lang").unwrap();
        assert_eq!(params.get("name"), Some("rust lang"));
    }

    #[test]
    fn test_wildcard_absorbs_remainder() {
        let pattern = PathPattern::parse("/files/*path");
        assert_eq!(
            pattern.match_path("/files/a/b/c").unwrap().get("path"),
            Some("a/b/c")
        );
        assert_eq!(
            pattern.match_path("/files").unwrap().capture("path"),
            crate::Capture::Empty
        );
        assert_eq!(
            pattern.match_path("/files/").unwrap().capture("path"),
            crate::Capture::Empty
        );
    }

    #[test]
    fn test_display_roundtrips_text() {
        let text = "/orgs/{org}/files/*rest";
        assert_eq!(PathPattern::parse(text).to_string(), text);
    }

    proptest! {
        #[test]
        fn prop_literal_pattern_matches_itself(segs in proptest::collection::vec("[a-z]{1,8}", 0..6)) {
            let path = format!("/{}", segs.join("/"));
            let pattern = PathPattern::parse(&path);
            prop_assert!(pattern.match_path(&path).is_some());
        }

        #[test]
        fn prop_capture_count_matches_pattern(n in 1usize..6) {
            let pattern_text: String = (0..n).map(|i| format!("/{{p{i}}}")).collect();
            let path: String = (0..n).map(|i| format!("/v{i}")).collect();
            let params = PathPattern::parse(&pattern_text).match_path(&path).unwrap();
            prop_assert_eq!(params.len(), n);
        }
    }
}

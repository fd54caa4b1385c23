//! Decode failure types.
//!
//! A [`DecodeFailure`] records the first declared input of an endpoint that
//! could not be decoded: which source it came from, its name, the raw value
//! that was rejected and why.

use std::fmt;

/// Where a declared input is read from.
///
/// The variant order is the decode order: all path inputs are decoded before
/// any query input, and so on, regardless of declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputSource {
    /// Path captures (e.g., `/users/{id}`)
    Path,
    /// Query string parameters
    Query,
    /// HTTP headers
    Header,
    /// Request body
    Body,
}

impl InputSource {
    /// Every source, in the order inputs are decoded.
    pub const DECODE_ORDER: [Self; 4] = [Self::Path, Self::Query, Self::Header, Self::Body];

    /// Short lowercase tag, as used in machine-readable error bodies.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path parameter"),
            Self::Query => write!(f, "query parameter"),
            Self::Header => write!(f, "header"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// Error produced by a codec.
///
/// Codecs only know about raw values, never about where the value came from;
/// the input layer wraps this into a [`DecodeFailure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    message: String,
}

impl CodecError {
    /// Creates a codec error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CodecError {}

/// What went wrong with an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The input was required but absent (or an empty path capture).
    Missing,
    /// The input was present but its codec rejected it.
    Malformed(CodecError),
    /// A path input names a capture the endpoint's pattern does not have.
    PathMismatch,
}

/// The first input of an endpoint that failed to decode.
///
/// # Example
///
/// ```rust
/// use waypost_extract::{DecodeFailure, FailureKind, InputSource};
///
/// let failure = DecodeFailure::missing(InputSource::Query, "count");
/// assert_eq!(failure.kind(), &FailureKind::Missing);
/// assert_eq!(failure.input(), Some("count"));
/// assert_eq!(failure.to_string(), "missing query parameter: count");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    input_source: InputSource,
    kind: FailureKind,
    input: Option<String>,
    raw: Option<String>,
}

impl DecodeFailure {
    /// A required input that is absent.
    #[must_use]
    pub fn missing(source: InputSource, input: impl Into<String>) -> Self {
        Self {
            input_source: source,
            kind: FailureKind::Missing,
            input: Some(input.into()),
            raw: None,
        }
    }

    /// A present input rejected by its codec.
    #[must_use]
    pub fn malformed(
        source: InputSource,
        input: Option<&str>,
        raw: impl Into<String>,
        cause: CodecError,
    ) -> Self {
        Self {
            input_source: source,
            kind: FailureKind::Malformed(cause),
            input: input.map(String::from),
            raw: Some(raw.into()),
        }
    }

    /// A path input whose capture is not part of the pattern.
    #[must_use]
    pub fn path_mismatch(input: impl Into<String>) -> Self {
        Self {
            input_source: InputSource::Path,
            kind: FailureKind::PathMismatch,
            input: Some(input.into()),
            raw: None,
        }
    }

    /// Returns which source the failing input reads from.
    #[must_use]
    pub fn input_source(&self) -> InputSource {
        self.input_source
    }

    /// Returns the failure kind.
    #[must_use]
    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    /// Returns the input name, if the input is named (bodies are not).
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Returns the raw value that was rejected.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Returns true for [`FailureKind::Missing`].
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self.kind, FailureKind::Missing)
    }

    /// Returns a stable code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            FailureKind::Missing => "MISSING_INPUT",
            FailureKind::Malformed(_) => "INVALID_INPUT",
            FailureKind::PathMismatch => "PATH_MISMATCH",
        }
    }

    /// Describes the failing input, e.g. `query parameter count`.
    #[must_use]
    pub fn describe_input(&self) -> String {
        match &self.input {
            Some(name) => format!("{} {name}", self.input_source),
            None => self.input_source.to_string(),
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = self.describe_input();
        match &self.kind {
            FailureKind::Missing => match &self.input {
                Some(name) => write!(f, "missing {}: {name}", self.input_source),
                None => write!(f, "missing {what}"),
            },
            FailureKind::Malformed(cause) => write!(f, "invalid value for {what}: {cause}"),
            FailureKind::PathMismatch => write!(f, "no capture for {what} in path pattern"),
        }
    }
}

impl std::error::Error for DecodeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            FailureKind::Malformed(cause) => Some(cause),
            _ => None,
        }
    }
}

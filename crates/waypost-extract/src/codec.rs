//! Codecs: the boundary between raw request bytes and typed values.
//!
//! Every declared input and output carries a [`Codec`]. The pipeline only
//! calls `decode`/`encode`; what a format looks like is the codec's business.
//!
//! | Codec | Value | Content type |
//! |-------|-------|--------------|
//! | [`FromStrCodec<T>`] | any `FromStr + Display` | `text/plain` |
//! | [`StringCodec`] | `String` | `text/plain; charset=utf-8` |
//! | [`BytesCodec`] | `Bytes` | `application/octet-stream` |
//! | [`JsonCodec<T>`] | serde types | `application/json` |
//! | [`FormCodec<T>`] | serde types | `application/x-www-form-urlencoded` |
//! | [`UnitCodec`] | `()` | none |

use crate::error::CodecError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

/// Decodes raw bytes into a value and encodes it back.
///
/// Codecs are shared by every request an endpoint handles, so they must be
/// stateless or internally synchronized.
///
/// # Example
///
/// ```rust
/// use waypost_extract::{Codec, CodecError};
/// use bytes::Bytes;
///
/// struct Upper;
///
/// impl Codec for Upper {
///     type Value = String;
///
///     fn decode(&self, raw: &[u8]) -> Result<String, CodecError> {
///         std::str::from_utf8(raw)
///             .map(str::to_uppercase)
///             .map_err(|e| CodecError::new(e.to_string()))
///     }
///
///     fn encode(&self, value: &String) -> Result<Bytes, CodecError> {
///         Ok(Bytes::from(value.to_lowercase()))
///     }
/// }
///
/// assert_eq!(Upper.decode(b"ab").unwrap(), "AB");
/// ```
pub trait Codec: Send + Sync + 'static {
    /// The typed value.
    type Value;

    /// Decodes a raw value.
    fn decode(&self, raw: &[u8]) -> Result<Self::Value, CodecError>;

    /// Encodes a value.
    fn encode(&self, value: &Self::Value) -> Result<Bytes, CodecError>;

    /// Content type of the encoded form, if it has one.
    fn content_type(&self) -> Option<&'static str> {
        None
    }
}

fn utf8(raw: &[u8]) -> Result<&str, CodecError> {
    std::str::from_utf8(raw).map_err(|e| CodecError::new(format!("invalid UTF-8: {e}")))
}

/// Parses and prints scalar values through `FromStr` and `Display`.
#[derive(Debug)]
pub struct FromStrCodec<T>(PhantomData<fn() -> T>);

impl<T> FromStrCodec<T> {
    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FromStrCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Codec for FromStrCodec<T>
where
    T: FromStr + Display + 'static,
    T::Err: Display,
{
    type Value = T;

    fn decode(&self, raw: &[u8]) -> Result<T, CodecError> {
        utf8(raw)?
            .parse()
            .map_err(|e: T::Err| CodecError::new(e.to_string()))
    }

    fn encode(&self, value: &T) -> Result<Bytes, CodecError> {
        Ok(Bytes::from(value.to_string()))
    }

    fn content_type(&self) -> Option<&'static str> {
        Some("text/plain; charset=utf-8")
    }
}

/// UTF-8 text, passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl Codec for StringCodec {
    type Value = String;

    fn decode(&self, raw: &[u8]) -> Result<String, CodecError> {
        utf8(raw).map(String::from)
    }

    fn encode(&self, value: &String) -> Result<Bytes, CodecError> {
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }

    fn content_type(&self) -> Option<&'static str> {
        Some("text/plain; charset=utf-8")
    }
}

/// Raw bytes, passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl Codec for BytesCodec {
    type Value = Bytes;

    fn decode(&self, raw: &[u8]) -> Result<Bytes, CodecError> {
        Ok(Bytes::copy_from_slice(raw))
    }

    fn encode(&self, value: &Bytes) -> Result<Bytes, CodecError> {
        Ok(value.clone())
    }

    fn content_type(&self) -> Option<&'static str> {
        Some("application/octet-stream")
    }
}

/// JSON via serde_json.
#[derive(Debug)]
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Codec for JsonCodec<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    type Value = T;

    fn decode(&self, raw: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(raw).map_err(|e| CodecError::new(e.to_string()))
    }

    fn encode(&self, value: &T) -> Result<Bytes, CodecError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| CodecError::new(e.to_string()))
    }

    fn content_type(&self) -> Option<&'static str> {
        Some("application/json")
    }
}

/// URL-encoded forms via serde_urlencoded.
#[derive(Debug)]
pub struct FormCodec<T>(PhantomData<fn() -> T>);

impl<T> FormCodec<T> {
    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FormCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Codec for FormCodec<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    type Value = T;

    fn decode(&self, raw: &[u8]) -> Result<T, CodecError> {
        serde_urlencoded::from_bytes(raw).map_err(|e| CodecError::new(e.to_string()))
    }

    fn encode(&self, value: &T) -> Result<Bytes, CodecError> {
        serde_urlencoded::to_string(value)
            .map(Bytes::from)
            .map_err(|e| CodecError::new(e.to_string()))
    }

    fn content_type(&self) -> Option<&'static str> {
        Some("application/x-www-form-urlencoded")
    }
}

/// No content. Decoding ignores the input; encoding yields an empty body.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCodec;

impl Codec for UnitCodec {
    type Value = ();

    fn decode(&self, _raw: &[u8]) -> Result<(), CodecError> {
        Ok(())
    }

    fn encode(&self, _value: &()) -> Result<Bytes, CodecError> {
        Ok(Bytes::new())
    }
}

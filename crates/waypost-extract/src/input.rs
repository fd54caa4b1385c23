//! Declared endpoint inputs.
//!
//! An [`Input`] knows where its value lives in a request and which codec
//! turns it into a typed value. Decoding one input never looks at any other.
//!
//! | Constructor | Source | Output | Absent |
//! |-------------|--------|--------|--------|
//! | [`path`] | path capture | `T` | `Missing` if the capture is empty |
//! | [`query`] | first query value | `T` | `Missing` |
//! | [`query_all`] | every query value | `Vec<T>` | empty vec |
//! | [`query_struct`] | whole query string | `T` (serde) | per serde |
//! | [`header`] | header | `T` | `Missing` |
//! | [`body`] | body bytes | codec value | codec decides |
//!
//! Any named input can be made optional with [`Input::optional`].

use crate::codec::{BytesCodec, Codec, FromStrCodec, JsonCodec, StringCodec};
use crate::error::{DecodeFailure, InputSource};
use crate::request::DecodeContext;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;
use waypost_router::Capture;

/// A single declared input of an endpoint.
pub trait Input: Send + Sync + 'static {
    /// The decoded value.
    type Output: Send + 'static;

    /// Where the input is read from.
    fn source(&self) -> InputSource;

    /// The input's name, when it has one.
    fn name(&self) -> Option<&str>;

    /// Decodes the input from a request.
    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Self::Output, DecodeFailure>;

    /// Turns a required input into an optional one.
    ///
    /// Absence yields `Ok(None)`; a present but malformed value still fails.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional(self)
    }
}

fn decode_text<C: Codec>(
    codec: &C,
    source: InputSource,
    name: &str,
    raw: &str,
) -> Result<C::Value, DecodeFailure> {
    codec
        .decode(raw.as_bytes())
        .map_err(|cause| DecodeFailure::malformed(source, Some(name), raw, cause))
}

/// A path capture.
#[derive(Debug)]
pub struct PathInput<C> {
    name: String,
    codec: C,
}

impl<C> Input for PathInput<C>
where
    C: Codec,
    C::Value: Send + 'static,
{
    type Output = C::Value;

    fn source(&self) -> InputSource {
        InputSource::Path
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<C::Value, DecodeFailure> {
        match ctx.path_params().capture(&self.name) {
            Capture::NotInPattern => Err(DecodeFailure::path_mismatch(&self.name)),
            Capture::Empty => Err(DecodeFailure::missing(InputSource::Path, &self.name)),
            Capture::Value(raw) => decode_text(&self.codec, InputSource::Path, &self.name, raw),
        }
    }
}

/// The first value of a query parameter.
#[derive(Debug)]
pub struct QueryInput<C> {
    name: String,
    codec: C,
}

impl<C> Input for QueryInput<C>
where
    C: Codec,
    C::Value: Send + 'static,
{
    type Output = C::Value;

    fn source(&self) -> InputSource {
        InputSource::Query
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<C::Value, DecodeFailure> {
        let raw = ctx
            .request()
            .query_value(&self.name)
            .ok_or_else(|| DecodeFailure::missing(InputSource::Query, &self.name))?;
        decode_text(&self.codec, InputSource::Query, &self.name, raw)
    }
}

/// Every value of a repeated query parameter. Never missing.
#[derive(Debug)]
pub struct QueryAllInput<C> {
    name: String,
    codec: C,
}

impl<C> Input for QueryAllInput<C>
where
    C: Codec,
    C::Value: Send + 'static,
{
    type Output = Vec<C::Value>;

    fn source(&self) -> InputSource {
        InputSource::Query
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Vec<C::Value>, DecodeFailure> {
        ctx.request()
            .query_values(&self.name)
            .map(|raw| decode_text(&self.codec, InputSource::Query, &self.name, raw))
            .collect()
    }
}

/// The whole query string deserialized into one serde type.
#[derive(Debug)]
pub struct QueryStructInput<T>(PhantomData<fn() -> T>);

impl<T> Input for QueryStructInput<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = T;

    fn source(&self) -> InputSource {
        InputSource::Query
    }

    fn name(&self) -> Option<&str> {
        None
    }

    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<T, DecodeFailure> {
        let raw = ctx.request().query_string().unwrap_or("");
        serde_urlencoded::from_str(raw).map_err(|e| {
            DecodeFailure::malformed(
                InputSource::Query,
                None,
                raw,
                crate::CodecError::new(e.to_string()),
            )
        })
    }
}

/// A request header, looked up case-insensitively.
#[derive(Debug)]
pub struct HeaderInput<C> {
    name: String,
    codec: C,
}

impl<C> Input for HeaderInput<C>
where
    C: Codec,
    C::Value: Send + 'static,
{
    type Output = C::Value;

    fn source(&self) -> InputSource {
        InputSource::Header
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<C::Value, DecodeFailure> {
        let value = ctx
            .request()
            .headers()
            .get(self.name.as_str())
            .ok_or_else(|| DecodeFailure::missing(InputSource::Header, &self.name))?;

        self.codec.decode(value.as_bytes()).map_err(|cause| {
            DecodeFailure::malformed(
                InputSource::Header,
                Some(&self.name),
                String::from_utf8_lossy(value.as_bytes()),
                cause,
            )
        })
    }
}

/// The request body.
#[derive(Debug)]
pub struct BodyInput<C> {
    codec: C,
}

impl<C> Input for BodyInput<C>
where
    C: Codec,
    C::Value: Send + 'static,
{
    type Output = C::Value;

    fn source(&self) -> InputSource {
        InputSource::Body
    }

    fn name(&self) -> Option<&str> {
        None
    }

    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<C::Value, DecodeFailure> {
        let raw = ctx.request().body();
        self.codec.decode(raw).map_err(|cause| {
            DecodeFailure::malformed(InputSource::Body, None, String::from_utf8_lossy(raw), cause)
        })
    }
}

/// An input whose absence is not a failure. See [`Input::optional`].
#[derive(Debug)]
pub struct Optional<I>(I);

impl<I: Input> Input for Optional<I> {
    type Output = Option<I::Output>;

    fn source(&self) -> InputSource {
        self.0.source()
    }

    fn name(&self) -> Option<&str> {
        self.0.name()
    }

    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Option<I::Output>, DecodeFailure> {
        match self.0.decode(ctx) {
            Ok(value) => Ok(Some(value)),
            Err(failure) if failure.is_missing() => Ok(None),
            Err(failure) => Err(failure),
        }
    }
}

/// A path capture parsed with `FromStr`.
pub fn path<T>(name: impl Into<String>) -> PathInput<FromStrCodec<T>>
where
    T: FromStr + Display + Send + 'static,
    T::Err: Display,
{
    path_with(name, FromStrCodec::new())
}

/// A path capture with an explicit codec.
pub fn path_with<C: Codec>(name: impl Into<String>, codec: C) -> PathInput<C> {
    PathInput {
        name: name.into(),
        codec,
    }
}

/// A query parameter parsed with `FromStr`.
pub fn query<T>(name: impl Into<String>) -> QueryInput<FromStrCodec<T>>
where
    T: FromStr + Display + Send + 'static,
    T::Err: Display,
{
    query_with(name, FromStrCodec::new())
}

/// A query parameter with an explicit codec.
pub fn query_with<C: Codec>(name: impl Into<String>, codec: C) -> QueryInput<C> {
    QueryInput {
        name: name.into(),
        codec,
    }
}

/// All values of a repeated query parameter, parsed with `FromStr`.
pub fn query_all<T>(name: impl Into<String>) -> QueryAllInput<FromStrCodec<T>>
where
    T: FromStr + Display + Send + 'static,
    T::Err: Display,
{
    QueryAllInput {
        name: name.into(),
        codec: FromStrCodec::new(),
    }
}

/// The whole query string as one serde type.
pub fn query_struct<T: DeserializeOwned>() -> QueryStructInput<T> {
    QueryStructInput(PhantomData)
}

/// A header parsed with `FromStr`.
pub fn header<T>(name: impl Into<String>) -> HeaderInput<FromStrCodec<T>>
where
    T: FromStr + Display + Send + 'static,
    T::Err: Display,
{
    header_with(name, FromStrCodec::new())
}

/// A header with an explicit codec.
pub fn header_with<C: Codec>(name: impl Into<String>, codec: C) -> HeaderInput<C> {
    HeaderInput {
        name: name.into().to_ascii_lowercase(),
        codec,
    }
}

/// The body with an explicit codec.
pub fn body<C: Codec>(codec: C) -> BodyInput<C> {
    BodyInput { codec }
}

/// The body as UTF-8 text.
pub fn string_body() -> BodyInput<StringCodec> {
    body(StringCodec)
}

/// The body as raw bytes.
pub fn bytes_body() -> BodyInput<BytesCodec> {
    body(BytesCodec)
}

/// The body as JSON.
pub fn json_body<T>() -> BodyInput<JsonCodec<T>>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    body(JsonCodec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureKind, ServerRequest};
    use http::Method;
    use serde::Deserialize;
    use waypost_router::Params;

    fn request(uri: &str) -> ServerRequest {
        ServerRequest::builder()
            .method(Method::GET)
            .uri(uri)
            .header("x-count", "5")
            .header("x-bad", "five")
            .body("hello")
            .build()
            .unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_path_capture() {
        let req = request("/users/42");
        let p = params(&[("id", "42")]);
        let ctx = DecodeContext::new(&req, &p);

        assert_eq!(path::<u64>("id").decode(&ctx).unwrap(), 42);
    }

    #[test]
    fn test_path_capture_empty_is_missing() {
        let req = request("/users/");
        let p = params(&[("id", "")]);
        let ctx = DecodeContext::new(&req, &p);

        let err = path::<u64>("id").decode(&ctx).unwrap_err();
        assert_eq!(err.kind(), &FailureKind::Missing);
        assert_eq!(err.input_source(), InputSource::Path);
    }

    #[test]
    fn test_path_capture_malformed() {
        let req = request("/users/abc");
        let p = params(&[("id", "abc")]);
        let ctx = DecodeContext::new(&req, &p);

        let err = path::<u64>("id").decode(&ctx).unwrap_err();
        assert!(matches!(err.kind(), FailureKind::Malformed(_)));
        assert_eq!(err.raw(), Some("abc"));
    }

    #[test]
    fn test_path_capture_not_in_pattern() {
        let req = request("/users");
        let p = Params::new();
        let ctx = DecodeContext::new(&req, &p);

        let err = path::<u64>("id").decode(&ctx).unwrap_err();
        assert_eq!(err.kind(), &FailureKind::PathMismatch);
    }

    #[test]
    fn test_query_required_and_optional() {
        let req = request("/echo?count=3");
        let p = Params::new();
        let ctx = DecodeContext::new(&req, &p);

        assert_eq!(query::<u32>("count").decode(&ctx).unwrap(), 3);
        assert!(query::<u32>("limit").decode(&ctx).unwrap_err().is_missing());
        assert_eq!(query::<u32>("limit").optional().decode(&ctx).unwrap(), None);
        assert_eq!(query::<u32>("count").optional().decode(&ctx).unwrap(), Some(3));
    }

    #[test]
    fn test_optional_does_not_hide_malformed() {
        let req = request("/echo?count=x");
        let p = Params::new();
        let ctx = DecodeContext::new(&req, &p);

        let err = query::<u32>("count").optional().decode(&ctx).unwrap_err();
        assert!(matches!(err.kind(), FailureKind::Malformed(_)));
    }

    #[test]
    fn test_query_all() {
        let req = request("/items?tag=1&tag=2&other=x");
        let p = Params::new();
        let ctx = DecodeContext::new(&req, &p);

        assert_eq!(query_all::<u8>("tag").decode(&ctx).unwrap(), vec![1, 2]);
        assert!(query_all::<u8>("none").decode(&ctx).unwrap().is_empty());
        assert!(query_all::<u8>("other").decode(&ctx).is_err());
    }

    #[test]
    fn test_query_struct() {
        #[derive(Debug, Deserialize)]
        struct Page {
            limit: u32,
            #[serde(default)]
            offset: Option<u32>,
        }

        let req = request("/items?limit=10");
        let p = Params::new();
        let ctx = DecodeContext::new(&req, &p);

        let page = query_struct::<Page>().decode(&ctx).unwrap();
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, None);

        let req = request("/items");
        let ctx = DecodeContext::new(&req, &p);
        assert!(query_struct::<Page>().decode(&ctx).is_err());
    }

    fn decode_query_generic<T>(uri: &str, name: &str) -> Result<Option<T>, DecodeFailure>
    where
        T: FromStr + Display + Send + 'static,
        T::Err: Display,
    {
        let req = request(uri);
        let p = Params::new();
        let ctx = DecodeContext::new(&req, &p);
        query::<T>(name).optional().decode(&ctx)
    }

    fn decode_json_generic<T>(req: &ServerRequest) -> Result<T, DecodeFailure>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let p = Params::new();
        let ctx = DecodeContext::new(req, &p);
        json_body::<T>().decode(&ctx)
    }

    #[test]
    fn test_constructors_usable_from_generic_code() {
        assert_eq!(decode_query_generic::<u32>("/x?n=5&n=x", "n").unwrap(), Some(5));
        assert_eq!(decode_query_generic::<u32>("/x", "n").unwrap(), None);

        let err = decode_query_generic::<u32>("/x?n=", "n").unwrap_err();
        assert!(matches!(err.kind(), FailureKind::Malformed(_)));

        let req = ServerRequest::builder().uri("/").body("[1,2]").build().unwrap();
        assert_eq!(decode_json_generic::<Vec<u8>>(&req).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_header_case_insensitive() {
        let req = request("/");
        let p = Params::new();
        let ctx = DecodeContext::new(&req, &p);

        assert_eq!(header::<u8>("X-Count").decode(&ctx).unwrap(), 5);
        let err = header::<u8>("x-bad").decode(&ctx).unwrap_err();
        assert_eq!(err.raw(), Some("five"));
        assert!(header::<u8>("x-none").decode(&ctx).unwrap_err().is_missing());
    }

    #[test]
    fn test_bodies() {
        let req = request("/");
        let p = Params::new();
        let ctx = DecodeContext::new(&req, &p);

        assert_eq!(string_body().decode(&ctx).unwrap(), "hello");
        assert_eq!(bytes_body().decode(&ctx).unwrap().len(), 5);

        let err = json_body::<serde_json::Value>().decode(&ctx).unwrap_err();
        assert_eq!(err.input_source(), InputSource::Body);
        assert_eq!(err.input(), None);
    }

    #[test]
    fn test_names_and_sources() {
        assert_eq!(query::<u8>("a").name(), Some("a"));
        assert_eq!(header::<u8>("X-A").name(), Some("x-a"));
        assert_eq!(string_body().name(), None);
        assert_eq!(path::<u8>("id").optional().source(), InputSource::Path);
    }
}

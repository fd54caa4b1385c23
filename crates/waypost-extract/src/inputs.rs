//! Ordered collections of inputs.
//!
//! An endpoint declares its inputs as a tuple. Decoding the tuple runs the
//! inputs stage by stage following [`InputSource::DECODE_ORDER`] and stops
//! at the first failure, so a malformed query parameter is reported even if
//! the body declared before it would also fail. Within one stage the
//! declaration order is kept.

use crate::error::{DecodeFailure, InputSource};
use crate::input::Input;
use crate::request::DecodeContext;
use std::fmt;

/// Name and source of one declared input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    /// Where the input is read from.
    pub source: InputSource,
    /// The input's name, if it has one.
    pub name: Option<String>,
}

impl fmt::Display for InputDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {name}", self.source),
            None => write!(f, "{}", self.source),
        }
    }
}

/// A tuple of [`Input`]s decoded together.
///
/// Implemented for `()` and tuples of up to eight inputs.
///
/// # Example
///
/// ```rust
/// use waypost_extract::{query, header, Inputs, DecodeContext, ServerRequest, Params};
///
/// let request = ServerRequest::builder()
///     .uri("/echo?count=2")
///     .header("x-trace", "abc")
///     .build()
///     .unwrap();
/// let params = Params::new();
/// let ctx = DecodeContext::new(&request, &params);
///
/// let inputs = (query::<u32>("count"), header::<String>("x-trace"));
/// let (count, trace) = inputs.decode_all(&ctx).unwrap();
/// assert_eq!(count, 2);
/// assert_eq!(trace, "abc");
/// ```
pub trait Inputs: Send + Sync + 'static {
    /// The decoded values, in declaration order.
    type Output: Send + 'static;

    /// Decodes every input, reporting the first failure in decode order.
    fn decode_all(&self, ctx: &DecodeContext<'_>) -> Result<Self::Output, DecodeFailure>;

    /// Describes the declared inputs in declaration order.
    fn describe(&self) -> Vec<InputDescriptor>;
}

impl Inputs for () {
    type Output = ();

    fn decode_all(&self, _ctx: &DecodeContext<'_>) -> Result<(), DecodeFailure> {
        Ok(())
    }

    fn describe(&self) -> Vec<InputDescriptor> {
        Vec::new()
    }
}

fn descriptor<I: Input>(input: &I) -> InputDescriptor {
    InputDescriptor {
        source: input.source(),
        name: input.name().map(String::from),
    }
}

macro_rules! impl_inputs_for_tuple {
    ($(($T:ident, $idx:tt, $slot:ident)),+) => {
        impl<$($T: Input),+> Inputs for ($($T,)+) {
            type Output = ($(<$T as Input>::Output,)+);

            fn decode_all(&self, ctx: &DecodeContext<'_>) -> Result<Self::Output, DecodeFailure> {
                $(let mut $slot = None;)+

                for stage in InputSource::DECODE_ORDER {
                    $(
                        if $slot.is_none() && self.$idx.source() == stage {
                            $slot = Some(self.$idx.decode(ctx)?);
                        }
                    )+
                }

                Ok(($(
                    match $slot {
                        Some(value) => value,
                        None => self.$idx.decode(ctx)?,
                    },
                )+))
            }

            fn describe(&self) -> Vec<InputDescriptor> {
                vec![$(descriptor(&self.$idx)),+]
            }
        }
    };
}

impl_inputs_for_tuple!((A, 0, a));
impl_inputs_for_tuple!((A, 0, a), (B, 1, b));
impl_inputs_for_tuple!((A, 0, a), (B, 1, b), (C, 2, c));
impl_inputs_for_tuple!((A, 0, a), (B, 1, b), (C, 2, c), (D, 3, d));
impl_inputs_for_tuple!((A, 0, a), (B, 1, b), (C, 2, c), (D, 3, d), (E, 4, e));
impl_inputs_for_tuple!((A, 0, a), (B, 1, b), (C, 2, c), (D, 3, d), (E, 4, e), (F, 5, f));
impl_inputs_for_tuple!(
    (A, 0, a),
    (B, 1, b),
    (C, 2, c),
    (D, 3, d),
    (E, 4, e),
    (F, 5, f),
    (G, 6, g)
);
impl_inputs_for_tuple!(
    (A, 0, a),
    (B, 1, b),
    (C, 2, c),
    (D, 3, d),
    (E, 4, e),
    (F, 5, f),
    (G, 6, g),
    (H, 7, h)
);

/// Appends one element to the end of a tuple.
///
/// Used by typed builders to grow an input list one declaration at a time.
pub trait Append<J> {
    /// The tuple with `J` appended.
    type Output;

    /// Appends `item`.
    fn append(self, item: J) -> Self::Output;
}

impl<J> Append<J> for () {
    type Output = (J,);

    fn append(self, item: J) -> (J,) {
        (item,)
    }
}

macro_rules! impl_append_for_tuple {
    ($(($T:ident, $idx:tt)),+) => {
        impl<$($T,)+ J> Append<J> for ($($T,)+) {
            type Output = ($($T,)+ J);

            fn append(self, item: J) -> Self::Output {
                ($(self.$idx,)+ item)
            }
        }
    };
}

impl_append_for_tuple!((A, 0));
impl_append_for_tuple!((A, 0), (B, 1));
impl_append_for_tuple!((A, 0), (B, 1), (C, 2));
impl_append_for_tuple!((A, 0), (B, 1), (C, 2), (D, 3));
impl_append_for_tuple!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
impl_append_for_tuple!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
impl_append_for_tuple!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6));

//! Splicing a one-argument step in front of a multi-argument function.
//!
//! The typical use is authentication: a step turns a credential into a user,
//! and the business logic takes the user plus the remaining decoded inputs.
//!
//! Two flavours exist:
//!
//! | Combinator | First step returns | Short-circuits on |
//! |------------|--------------------|-------------------|
//! | [`and_then_first`] | `Result<U, X>` | `Err(X)` |
//! | [`and_then_first_either`] | `Result<Result<U, E>, X>` | `Err(X)` and `Ok(Err(E))` |
//!
//! In both cases the first step completes before the second one starts, and
//! the second one never runs when the first fails. The trailing arguments
//! are passed as a tuple of zero to four elements.
//!
//! # Example
//!
//! ```rust
//! use waypost_core::and_then_first;
//!
//! async fn authenticate(token: String) -> Result<u64, String> {
//!     token.strip_prefix("user-").and_then(|id| id.parse().ok()).ok_or(token)
//! }
//!
//! async fn rename(user: u64, id: u32, name: String) -> Result<String, String> {
//!     Ok(format!("{user} renamed {id} to {name}"))
//! }
//!
//! # tokio_test::block_on(async {
//! let guarded = and_then_first(authenticate, rename);
//!
//! let ok = guarded.call("user-7".to_string(), (3, "box".to_string())).await;
//! assert_eq!(ok.unwrap(), "7 renamed 3 to box");
//!
//! let denied = guarded.call("nobody".to_string(), (3, "box".to_string())).await;
//! assert_eq!(denied.unwrap_err(), "nobody");
//! # });
//! ```

use std::future::Future;

/// A function that can be called with one leading argument plus a tuple of
/// trailing arguments.
///
/// Implemented for every `Fn(U, A1, .., An) -> R` with `n` from 0 to 4.
pub trait CallWithFirst<U, Args> {
    /// The function's return type.
    type Output;

    /// Calls `self(first, args.0, .., args.n)`.
    fn call_with_first(&self, first: U, args: Args) -> Self::Output;
}

macro_rules! impl_call_with_first {
    ($($A:ident $a:ident),*) => {
        impl<F, U, R, $($A),*> CallWithFirst<U, ($($A,)*)> for F
        where
            F: Fn(U, $($A),*) -> R,
        {
            type Output = R;

            #[allow(clippy::unused_unit)]
            fn call_with_first(&self, first: U, args: ($($A,)*)) -> R {
                let ($($a,)*) = args;
                self(first, $($a),*)
            }
        }
    };
}

impl_call_with_first!();
impl_call_with_first!(A1 a1);
impl_call_with_first!(A1 a1, A2 a2);
impl_call_with_first!(A1 a1, A2 a2, A3 a3);
impl_call_with_first!(A1 a1, A2 a2, A3 a3, A4 a4);

/// A tuple split into its first element and the rest.
///
/// Lets a combinator take the decoded input tuple of an endpoint as is.
pub trait SplitFirst {
    /// The first element.
    type First;
    /// The remaining elements.
    type Rest;

    /// Splits the tuple.
    fn split_first(self) -> (Self::First, Self::Rest);
}

macro_rules! impl_split_first {
    ($($A:ident $a:ident),*) => {
        impl<T, $($A),*> SplitFirst for (T, $($A,)*) {
            type First = T;
            type Rest = ($($A,)*);

            #[allow(clippy::unused_unit)]
            fn split_first(self) -> (T, ($($A,)*)) {
                let (first, $($a,)*) = self;
                (first, ($($a,)*))
            }
        }
    };
}

impl_split_first!();
impl_split_first!(A1 a1);
impl_split_first!(A1 a1, A2 a2);
impl_split_first!(A1 a1, A2 a2, A3 a3);
impl_split_first!(A1 a1, A2 a2, A3 a3, A4 a4);

/// See [`and_then_first`].
#[derive(Debug, Clone, Copy)]
pub struct AndThenFirst<F1, F2> {
    first: F1,
    then: F2,
}

/// Runs `first` on the leading argument, then `then` on its result and the
/// trailing arguments. A failure of `first` is returned as is.
pub fn and_then_first<F1, F2>(first: F1, then: F2) -> AndThenFirst<F1, F2> {
    AndThenFirst { first, then }
}

impl<F1, F2> AndThenFirst<F1, F2> {
    /// Calls the combined function.
    pub async fn call<T, Args, Fut1, U, X, Fut2, O>(&self, input: T, args: Args) -> Result<O, X>
    where
        F1: Fn(T) -> Fut1,
        Fut1: Future<Output = Result<U, X>>,
        F2: CallWithFirst<U, Args, Output = Fut2>,
        Fut2: Future<Output = Result<O, X>>,
    {
        let first = (self.first)(input).await?;
        self.then.call_with_first(first, args).await
    }

    /// Calls the combined function with all arguments in one tuple.
    pub async fn call_tuple<Tup, T, Args, Fut1, U, X, Fut2, O>(&self, input: Tup) -> Result<O, X>
    where
        Tup: SplitFirst<First = T, Rest = Args>,
        F1: Fn(T) -> Fut1,
        Fut1: Future<Output = Result<U, X>>,
        F2: CallWithFirst<U, Args, Output = Fut2>,
        Fut2: Future<Output = Result<O, X>>,
    {
        let (first, rest) = input.split_first();
        self.call(first, rest).await
    }
}

/// See [`and_then_first_either`].
#[derive(Debug, Clone, Copy)]
pub struct AndThenFirstEither<F1, F2> {
    first: F1,
    then: F2,
}

/// Like [`and_then_first`] for steps that answer with an explicit error value.
///
/// When `first` yields `Ok(Err(e))`, the combined function yields `Ok(Err(e))`
/// without calling `then`. A fault (`Err(x)`) short-circuits the same way.
///
/// ```rust
/// use waypost_core::and_then_first_either;
/// use std::convert::Infallible;
///
/// async fn check(age: u8) -> Result<Result<u8, &'static str>, Infallible> {
///     Ok(if age >= 18 { Ok(age) } else { Err("too young") })
/// }
///
/// async fn greet(age: u8) -> Result<Result<String, &'static str>, Infallible> {
///     Ok(Ok(format!("welcome, {age}")))
/// }
///
/// # tokio_test::block_on(async {
/// let guarded = and_then_first_either(check, greet);
/// assert_eq!(guarded.call(30, ()).await.unwrap(), Ok("welcome, 30".to_string()));
/// assert_eq!(guarded.call(12, ()).await.unwrap(), Err("too young"));
/// # });
/// ```
pub fn and_then_first_either<F1, F2>(first: F1, then: F2) -> AndThenFirstEither<F1, F2> {
    AndThenFirstEither { first, then }
}

impl<F1, F2> AndThenFirstEither<F1, F2> {
    /// Calls the combined function.
    pub async fn call<T, Args, Fut1, U, E, X, Fut2, O>(
        &self,
        input: T,
        args: Args,
    ) -> Result<Result<O, E>, X>
    where
        F1: Fn(T) -> Fut1,
        Fut1: Future<Output = Result<Result<U, E>, X>>,
        F2: CallWithFirst<U, Args, Output = Fut2>,
        Fut2: Future<Output = Result<Result<O, E>, X>>,
    {
        match (self.first)(input).await? {
            Ok(first) => self.then.call_with_first(first, args).await,
            Err(error) => Ok(Err(error)),
        }
    }

    /// Calls the combined function with all arguments in one tuple.
    pub async fn call_tuple<Tup, T, Args, Fut1, U, E, X, Fut2, O>(
        &self,
        input: Tup,
    ) -> Result<Result<O, E>, X>
    where
        Tup: SplitFirst<First = T, Rest = Args>,
        F1: Fn(T) -> Fut1,
        Fut1: Future<Output = Result<Result<U, E>, X>>,
        F2: CallWithFirst<U, Args, Output = Fut2>,
        Fut2: Future<Output = Result<Result<O, E>, X>>,
    {
        let (first, rest) = input.split_first();
        self.call(first, rest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    async fn double(x: i32) -> Result<i32, String> {
        if x < 0 {
            Err(format!("negative: {x}"))
        } else {
            Ok(x * 2)
        }
    }

    async fn sum4(u: i32, a: i32, b: i32, c: i32, d: i32) -> Result<i32, String> {
        Ok(u + a + b + c + d)
    }

    #[test]
    fn test_call_with_first_arities() {
        let f0 = |u: i32| u;
        let f2 = |u: i32, a: i32, b: &str| format!("{u}{a}{b}");
        assert_eq!(f0.call_with_first(1, ()), 1);
        assert_eq!(f2.call_with_first(1, (2, "x")), "12x");
    }

    #[test]
    fn test_split_first() {
        assert_eq!((1,).split_first(), (1, ()));
        assert_eq!((1, 'a', "b").split_first(), (1, ('a', "b")));
    }

    #[tokio::test]
    async fn test_arity_zero_and_four() {
        let g0 = and_then_first(double, |u: i32| async move { Ok::<_, String>(u + 1) });
        assert_eq!(g0.call(5, ()).await, Ok(11));

        let g4 = and_then_first(double, sum4);
        assert_eq!(g4.call(1, (1, 1, 1, 1)).await, Ok(6));
        assert_eq!(g4.call_tuple((1, 1, 1, 1, 1)).await, Ok(6));
    }

    #[tokio::test]
    async fn test_failure_skips_second_step() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let g = and_then_first(double, move |u: i32, label: &'static str| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, String>(format!("{label}{u}")) }
        });

        assert_eq!(g.call(-1, ("n",)).await, Err("negative: -1".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(g.call(2, ("n",)).await, Ok("n4".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_completes_before_second_starts() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first_log = Arc::clone(&log);
        let then_log = Arc::clone(&log);

        let g = and_then_first(
            move |x: u8| {
                let log = Arc::clone(&first_log);
                async move {
                    tokio::task::yield_now().await;
                    log.lock().unwrap().push("first");
                    Ok::<_, Infallible>(x)
                }
            },
            move |x: u8| {
                then_log.lock().unwrap().push("then");
                async move { Ok::<_, Infallible>(x) }
            },
        );

        g.call(1, ()).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "then"]);
    }

    #[tokio::test]
    async fn test_either_short_circuits_on_error_branch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let auth = |token: &'static str| async move {
            Ok::<_, Infallible>(if token == "secret" { Ok(1_u32) } else { Err(401_u16) })
        };
        let g = and_then_first_either(auth, move |user: u32, item: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, Infallible>(Ok::<_, u16>(user * 100 + item)) }
        });

        assert_eq!(g.call("wrong", (5,)).await.unwrap(), Err(401));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(g.call_tuple(("secret", 5)).await.unwrap(), Ok(105));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_either_propagates_fault() {
        let g = and_then_first_either(
            |_: ()| async { Err::<Result<u8, String>, _>("fault") },
            |u: u8| async move { Ok::<_, &str>(Ok::<_, String>(u)) },
        );
        assert_eq!(g.call((), ()).await, Err("fault"));
    }

    proptest! {
        #[test]
        fn and_then_first_law(t in -50_i32..50, a in -50_i32..50, b in -50_i32..50) {
            let add3 = |u: i32, a: i32, b: i32| async move { Ok::<_, String>(u + a + b) };
            let g = and_then_first(double, add3);

            let combined = tokio_test::block_on(g.call(t, (a, b)));
            let expected = tokio_test::block_on(async {
                match double(t).await {
                    Ok(u) => add3(u, a, b).await,
                    Err(e) => Err(e),
                }
            });
            prop_assert_eq!(combined, expected);
        }

        #[test]
        fn and_then_first_either_law(t in 0_u8..20, a in 0_u8..20) {
            let check = |x: u8| async move {
                Ok::<_, Infallible>(if x % 3 == 0 { Err(x) } else { Ok(u16::from(x)) })
            };
            let add = |u: u16, a: u8| async move { Ok::<_, Infallible>(Ok::<_, u8>(u + u16::from(a))) };
            let g = and_then_first_either(check, add);

            let combined = tokio_test::block_on(g.call(t, (a,))).unwrap();
            let expected = if t % 3 == 0 { Err(t) } else { Ok(u16::from(t) + u16::from(a)) };
            prop_assert_eq!(combined, expected);
        }
    }
}

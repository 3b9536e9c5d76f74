//! Reusable wrappers around functions whose panics should be discarded.
//!
//! Rust has no variadic or overloaded closures, so [`CatchWrap::call`] takes
//! the wrapped function's arguments as a tuple. [`Callable`] covers `Fn`
//! closures and function items of zero to six parameters.

use crate::runner::Catcher;

/// A function callable with its arguments packed into a tuple.
pub trait Callable<Args> {
    type Output;

    fn call_with(&self, args: Args) -> Self::Output;
}

macro_rules! impl_callable {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg,)*> Callable<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Ret,
        {
            type Output = Ret;

            #[allow(non_snake_case)]
            fn call_with(&self, ($($arg,)*): ($($arg,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

impl_callable!();
impl_callable!(A1);
impl_callable!(A1, A2);
impl_callable!(A1, A2, A3);
impl_callable!(A1, A2, A3, A4);
impl_callable!(A1, A2, A3, A4, A5);
impl_callable!(A1, A2, A3, A4, A5, A6);

/// What a [`CatchWrap`] returns, given the wrapped function's result type.
pub trait Fallback<R> {
    type Output;

    fn on_return(&self, value: R) -> Self::Output;

    fn on_panic(&self) -> Self::Output;
}

/// No fallback: the wrapper returns `Option<R>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Absent;

impl<R> Fallback<R> for Absent {
    type Output = Option<R>;

    fn on_return(&self, value: R) -> Option<R> {
        Some(value)
    }

    fn on_panic(&self) -> Option<R> {
        None
    }
}

/// A fixed fallback value, cloned for every panicking call.
#[derive(Debug, Clone)]
pub struct Value<T>(pub T);

impl<R, T> Fallback<R> for Value<T>
where
    R: Into<T>,
    T: Clone,
{
    type Output = T;

    fn on_return(&self, value: R) -> T {
        value.into()
    }

    fn on_panic(&self) -> T {
        self.0.clone()
    }
}

/// A fallback built on demand for every panicking call.
#[derive(Debug, Clone)]
pub struct OrElse<G>(pub G);

impl<R, T, G> Fallback<R> for OrElse<G>
where
    R: Into<T>,
    G: Fn() -> T,
{
    type Output = T;

    fn on_return(&self, value: R) -> T {
        value.into()
    }

    fn on_panic(&self) -> T {
        (self.0)()
    }
}

/// A function wrapped so every call discards panics.
///
/// Built by [`catch_wrap`], [`catch_wrap_or`] and [`catch_wrap_or_else`].
/// Each call is equivalent to running the function through
/// [`Catcher::run_or_else`]; calls share nothing but the function and the
/// fallback.
#[derive(Debug, Clone)]
pub struct CatchWrap<F, D> {
    func: F,
    fallback: D,
    catcher: Catcher,
}

impl<F, D> CatchWrap<F, D> {
    /// Wrap `func` with an explicit [`Catcher`] and fallback policy.
    pub fn with_catcher(func: F, fallback: D, catcher: Catcher) -> Self {
        Self {
            func,
            fallback,
            catcher,
        }
    }

    /// Call the wrapped function with `args` packed as a tuple: `()` for no
    /// arguments, `(a,)` for one, `(a, b)` for two.
    pub fn call<Args>(&self, args: Args) -> D::Output
    where
        F: Callable<Args>,
        D: Fallback<F::Output>,
    {
        self.catcher.run_or_else(
            || self.fallback.on_return(self.func.call_with(args)),
            || self.fallback.on_panic(),
        )
    }

    /// Unwrap, returning the original function.
    pub fn into_inner(self) -> F {
        self.func
    }
}

/// Wrap `func` so that a panicking call returns `None`.
///
/// ```
/// let parse = catcher::catch_wrap(|s: &str| s.parse::<u16>().expect("number"));
/// assert_eq!(parse.call(("8080",)), Some(8080));
/// assert_eq!(parse.call(("http",)), None);
/// ```
pub fn catch_wrap<F>(func: F) -> CatchWrap<F, Absent> {
    CatchWrap::with_catcher(func, Absent, Catcher::global())
}

/// Wrap `func` so that a panicking call returns a clone of `fallback`.
pub fn catch_wrap_or<F, T: Clone>(func: F, fallback: T) -> CatchWrap<F, Value<T>> {
    CatchWrap::with_catcher(func, Value(fallback), Catcher::global())
}

/// Wrap `func` so that a panicking call returns `make_fallback()`.
pub fn catch_wrap_or_else<F, G>(func: F, make_fallback: G) -> CatchWrap<F, OrElse<G>> {
    CatchWrap::with_catcher(func, OrElse(make_fallback), Catcher::global())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::{Absent, CatchWrap, OrElse, Value};
    use crate::capability::{Capability, Unsupported};
    use crate::quiet::quiet_depth;
    use crate::runner::Catcher;

    fn odd_length(s: &str) -> bool {
        assert!(!s.is_empty(), "empty string!");
        s.len() % 2 == 1
    }

    fn quiet() -> Catcher {
        Catcher::new(&Capability::Available)
    }

    #[test]
    fn absent_fallback_yields_option() {
        let wrapped = CatchWrap::with_catcher(odd_length, Absent, quiet());
        assert_eq!(wrapped.call(("",)), None);
        assert_eq!(wrapped.call(("123",)), Some(true));
        assert_eq!(wrapped.call(("12",)), Some(false));
    }

    #[test]
    fn value_fallback_is_returned_on_every_panic() {
        let wrapped = CatchWrap::with_catcher(odd_length, Value(false), quiet());
        assert!(!wrapped.call(("",)));
        assert!(!wrapped.call(("",)));
        assert!(wrapped.call(("123",)));
    }

    #[test]
    fn fallback_may_be_a_wider_type() {
        let wrapped = CatchWrap::with_catcher(|n: u8| 100 / n, Value(u32::MAX), quiet());
        assert_eq!(wrapped.call((4,)), 25_u32);
        assert_eq!(wrapped.call((0,)), u32::MAX);
    }

    #[test]
    fn zero_and_multi_argument_functions() {
        let nothing = CatchWrap::with_catcher(|| 42, Absent, quiet());
        assert_eq!(nothing.call(()), Some(42));

        let slice = CatchWrap::with_catcher(
            |items: &[u8], from: usize, to: usize| items[from..to].to_vec(),
            Value(Vec::<u8>::new()),
            quiet(),
        );
        assert_eq!(slice.call((&[1, 2, 3][..], 1, 3)), vec![2, 3]);
        assert_eq!(slice.call((&[1, 2, 3][..], 2, 9)), Vec::<u8>::new());
    }

    #[test]
    fn each_call_restores_depth() {
        let wrapped = CatchWrap::with_catcher(
            |fail: bool| {
                assert!(!fail, "asked to fail");
                quiet_depth()
            },
            Value(usize::MAX),
            quiet(),
        );
        assert_eq!(wrapped.call((false,)), 1);
        assert_eq!(quiet_depth(), 0);
        assert_eq!(wrapped.call((true,)), usize::MAX);
        assert_eq!(quiet_depth(), 0);
    }

    #[test]
    fn side_effects_happen_once_per_call() {
        let calls = Cell::new(0);
        let wrapped = CatchWrap::with_catcher(
            |n: u32| {
                calls.set(calls.get() + 1);
                10 / n
            },
            Absent,
            quiet(),
        );
        assert_eq!(wrapped.call((2,)), Some(5));
        assert_eq!(wrapped.call((0,)), None);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn unavailable_capability_leaves_depth_alone() {
        let loud = Catcher::new(&Capability::Unavailable(Unsupported::AbortStrategy));
        let wrapped = CatchWrap::with_catcher(quiet_depth, Absent, loud);
        assert_eq!(wrapped.call(()), Some(0));
    }

    #[test]
    fn into_inner_returns_the_unwrapped_function() {
        let wrapped = CatchWrap::with_catcher(odd_length, Absent, quiet());
        assert_eq!(wrapped.call(("1",)), Some(true));
        let plain = wrapped.into_inner();
        assert!(!plain("12"));
    }

    #[test]
    fn or_else_builds_fallback_per_panic() {
        let built = Cell::new(0);
        let wrapped = CatchWrap::with_catcher(
            odd_length,
            OrElse(|| {
                built.set(built.get() + 1);
                false
            }),
            quiet(),
        );
        assert!(wrapped.call(("1",)));
        assert!(!wrapped.call(("",)));
        assert!(!wrapped.call(("",)));
        assert_eq!(built.get(), 2);
    }
}

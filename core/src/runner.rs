//! The catch-and-suppress runner.

use std::any::Any;
use std::mem;
use std::panic::{self, AssertUnwindSafe};

use crate::capability::{Capability, capability};
use crate::quiet::QuietGuard;

/// Runs closures, discarding any panic they raise.
///
/// A `Catcher` carries the capability decision. On an available capability
/// each call raises the calling thread's quiet depth for the duration of the
/// closure so the panic hook is skipped, and restores it on every exit path.
/// Otherwise the quiet depth and the panic hook are never touched.
///
/// Closures are run under [`AssertUnwindSafe`]: state the closure mutated
/// before panicking is left as it was when the panic started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catcher {
    quiet: bool,
}

impl Catcher {
    #[must_use]
    pub fn new(capability: &Capability) -> Self {
        Self {
            quiet: capability.is_available(),
        }
    }

    /// Catcher for the process-wide capability, probing it on first use.
    #[must_use]
    pub fn global() -> Self {
        Self::new(capability())
    }

    /// Run `op`, returning `None` if it panics.
    pub fn run<T>(self, op: impl FnOnce() -> T) -> Option<T> {
        let _quiet = self.quiet.then(QuietGuard::acquire);
        match panic::catch_unwind(AssertUnwindSafe(op)) {
            Ok(value) => Some(value),
            Err(payload) => {
                discard(payload);
                None
            }
        }
    }

    /// Run `op`, returning `fallback` if it panics.
    pub fn run_or<T>(self, op: impl FnOnce() -> T, fallback: T) -> T {
        self.run(op).unwrap_or(fallback)
    }

    /// Run `op`, building the fallback with `make_fallback` if it panics.
    ///
    /// `make_fallback` runs after the quiet depth has been restored.
    pub fn run_or_else<T>(self, op: impl FnOnce() -> T, make_fallback: impl FnOnce() -> T) -> T {
        self.run(op).unwrap_or_else(make_fallback)
    }

    /// Run a fallible `op`, returning `None` if it returns `Err` or panics.
    pub fn try_run<T, E>(self, op: impl FnOnce() -> Result<T, E>) -> Option<T> {
        self.run(op).and_then(Result::ok)
    }

    /// Run a fallible `op`, returning `fallback` if it returns `Err` or
    /// panics.
    pub fn try_run_or<T, E>(self, op: impl FnOnce() -> Result<T, E>, fallback: T) -> T {
        self.try_run(op).unwrap_or(fallback)
    }
}

// A payload whose Drop panics must not escape the runner.
fn discard(payload: Box<dyn Any + Send>) {
    if let Err(nested) = panic::catch_unwind(AssertUnwindSafe(move || drop(payload))) {
        mem::forget(nested);
    }
}

/// Run `op` with the process-wide [`Catcher`], returning `None` if it panics.
///
/// ```
/// let names = vec!["a"];
/// assert_eq!(catcher::catcher(|| names[3]), None);
/// assert_eq!(catcher::catcher(|| names[0]), Some("a"));
/// ```
pub fn catcher<T>(op: impl FnOnce() -> T) -> Option<T> {
    Catcher::global().run(op)
}

/// Run `op` with the process-wide [`Catcher`], returning `fallback` if it
/// panics.
pub fn catcher_or<T>(op: impl FnOnce() -> T, fallback: T) -> T {
    Catcher::global().run_or(op, fallback)
}

pub fn catcher_or_else<T>(op: impl FnOnce() -> T, make_fallback: impl FnOnce() -> T) -> T {
    Catcher::global().run_or_else(op, make_fallback)
}

/// Run a fallible `op` with the process-wide [`Catcher`]; both `Err` and a
/// panic yield `None`.
///
/// ```
/// use std::path::Path;
///
/// let candidates = ["/nonexistent/a.toml", "/nonexistent/b.toml"];
/// let found = candidates
///     .iter()
///     .find_map(|path| catcher::try_catcher(|| std::fs::metadata(Path::new(path))));
/// assert!(found.is_none());
/// ```
pub fn try_catcher<T, E>(op: impl FnOnce() -> Result<T, E>) -> Option<T> {
    Catcher::global().try_run(op)
}

pub fn try_catcher_or<T, E>(op: impl FnOnce() -> Result<T, E>, fallback: T) -> T {
    Catcher::global().try_run_or(op, fallback)
}

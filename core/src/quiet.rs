//! Per-thread quiet depth.
//!
//! The depth is the diagnostic setting consulted by the panic-hook gate: while
//! it is non-zero on a thread, panics raised on that thread skip the hook.
//! Depth is raised and restored only through [`QuietGuard`].

use std::cell::Cell;

thread_local! {
    static QUIET_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Current quiet depth of the calling thread.
#[must_use]
pub fn quiet_depth() -> usize {
    QUIET_DEPTH.try_with(Cell::get).unwrap_or(0)
}

/// Whether panics on the calling thread currently bypass the hook.
pub(crate) fn is_quiet() -> bool {
    quiet_depth() > 0
}

/// RAII guard that raises the calling thread's quiet depth and restores the
/// saved value on drop, including during unwinding.
#[must_use = "the quiet depth is restored as soon as the guard is dropped"]
pub(crate) struct QuietGuard {
    saved: usize,
}

impl QuietGuard {
    pub(crate) fn acquire() -> Self {
        let saved = quiet_depth();
        let _ = QUIET_DEPTH.try_with(|depth| depth.set(saved.saturating_add(1)));
        Self { saved }
    }
}

impl Drop for QuietGuard {
    fn drop(&mut self) {
        let _ = QUIET_DEPTH.try_with(|depth| depth.set(self.saved));
    }
}

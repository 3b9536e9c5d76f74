//! Cheap failure suppression for hot paths.
//!
//! Some call sites expect to fail most of the time: probing candidate paths,
//! speculative parses, lookups in optional plugins. When such a call panics,
//! the panic hook still formats a message and, with `RUST_BACKTRACE` set,
//! captures a backtrace, only for the caller to throw the result away.
//!
//! This crate runs the closure under `catch_unwind`, discards the panic
//! payload without looking at it, and returns either the value or a fallback.
//! While the closure runs, the calling thread is marked *quiet* and a gate
//! installed in front of the panic hook skips the hook entirely.
//!
//! - [`catcher`], [`catcher_or`]: run a closure once
//! - [`try_catcher`], [`try_catcher_or`]: same, also discarding `Err`
//! - [`catch_wrap`], [`catch_wrap_or`]: wrap a function for repeated calls
//! - [`init`]: apply a [`CatcherConfig`] before first use
//!
//! Every failure is discarded: use these only where the error carries no
//! information the caller needs.
//!
//! # Capability
//!
//! The gate is installed by a one-time probe on first use. It is skipped
//! (and the panic hook left untouched) when [`CatcherConfig::quiet_panics`]
//! is off, when built with `panic = "abort"`, or when first used on a thread
//! that is already panicking. Replacing the panic hook after the probe
//! removes the gate; catching keeps working but suppressed panics are
//! reported again.

mod capability;
mod quiet;
mod runner;
mod wrap;

pub use capability::{Capability, InitError, Unsupported, capability, init, probe_count};
pub use catcher_config::{CatcherConfig, ConfigError};
pub use quiet::quiet_depth;
pub use runner::{Catcher, catcher, catcher_or, catcher_or_else, try_catcher, try_catcher_or};
pub use wrap::{
    Absent, CatchWrap, Callable, Fallback, OrElse, Value, catch_wrap, catch_wrap_or,
    catch_wrap_or_else,
};

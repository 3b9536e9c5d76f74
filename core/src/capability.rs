//! One-time probe deciding whether panic diagnostics can be silenced.
//!
//! The probe runs at most once per process. When it succeeds it wraps the
//! current panic hook in a gate that skips the hook on threads whose quiet
//! depth is non-zero; every other panic is forwarded unchanged.

use std::panic::{self, PanicHookInfo};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use catcher_config::CatcherConfig;
use thiserror::Error;

use crate::quiet::is_quiet;

static CAPABILITY: OnceLock<Capability> = OnceLock::new();
static PROBES: AtomicUsize = AtomicUsize::new(0);

/// Outcome of the capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The panic-hook gate is installed; runner calls raise the quiet depth.
    Available,
    /// The panic hook is left untouched and runner calls never raise the
    /// quiet depth. Catching still works.
    Unavailable(Unsupported),
}

impl Capability {
    #[must_use]
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Why the panic-hook gate could not be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unsupported {
    #[error("panic hook silencing is disabled by configuration")]
    Disabled,
    #[error("built with panic = \"abort\"; panics cannot be intercepted")]
    AbortStrategy,
    #[error("capability probe ran on a panicking thread")]
    Panicking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("capability was already probed ({capability:?}); configuration must be applied first")]
    AlreadyProbed { capability: Capability },
}

/// Process-wide capability, probed with the default configuration on first
/// use.
pub fn capability() -> &'static Capability {
    probe_once(CatcherConfig::default()).0
}

/// Probe the capability with `config`.
///
/// Must run before anything else calls [`capability`]; the probe never runs
/// twice, so a late call fails with [`InitError::AlreadyProbed`].
pub fn init(config: CatcherConfig) -> Result<&'static Capability, InitError> {
    match probe_once(config) {
        (capability, true) => Ok(capability),
        (capability, false) => Err(InitError::AlreadyProbed {
            capability: *capability,
        }),
    }
}

/// Number of capability probes this process has run (0 or 1).
#[must_use]
pub fn probe_count() -> usize {
    PROBES.load(Ordering::Relaxed)
}

/// Returns the capability and whether this call ran the probe.
///
/// Logging happens after the `OnceLock` is initialized so a subscriber that
/// calls back into the runner sees a settled capability.
fn probe_once(config: CatcherConfig) -> (&'static Capability, bool) {
    let mut probed_here = false;
    let capability = CAPABILITY.get_or_init(|| {
        probed_here = true;
        probe(config)
    });
    if probed_here {
        report(*capability);
    }
    (capability, probed_here)
}

fn probe(config: CatcherConfig) -> Capability {
    PROBES.fetch_add(1, Ordering::Relaxed);

    match check(config, cfg!(panic = "unwind"), thread::panicking()) {
        Ok(()) => {
            install_gate();
            Capability::Available
        }
        Err(reason) => Capability::Unavailable(reason),
    }
}

fn report(capability: Capability) {
    match capability {
        Capability::Available => tracing::debug!("Installed quiet panic hook gate"),
        Capability::Unavailable(Unsupported::Disabled) => {
            tracing::debug!("Quiet panics disabled by configuration");
        }
        Capability::Unavailable(reason) => {
            tracing::warn!(%reason, "Suppressed panics will still reach the panic hook");
        }
    }
}

fn check(config: CatcherConfig, unwinds: bool, panicking: bool) -> Result<(), Unsupported> {
    if !config.quiet_panics {
        return Err(Unsupported::Disabled);
    }
    if !unwinds {
        return Err(Unsupported::AbortStrategy);
    }
    // take_hook panics when called from a panicking thread.
    if panicking {
        return Err(Unsupported::Panicking);
    }
    Ok(())
}

fn install_gate() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
        if is_quiet() {
            return;
        }
        previous(info);
    }));
}

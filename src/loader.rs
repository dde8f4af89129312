//! Record loading and the single-initialization gate.
//!
//! Responsibilities:
//! - Populate every field of a record from the environment ([`load`]).
//! - Guarantee at-most-once loading per caller-owned gate ([`LoadGate`],
//!   [`load_once`]).
//!
//! Does NOT handle:
//! - Raw string parsing (see env.rs).
//! - Report rendering (see report.rs).
//!
//! Invariants:
//! - Fields are loaded in declaration order; a parse failure aborts the load
//!   with earlier fields already written (loading is not atomic).
//! - A gate fires at most once per process, counting a failed load as fired;
//!   concurrent callers block until the first load completes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::env::resolve_raw;
use crate::error::ConfigError;
use crate::field::EnvRecord;

/// Populate every field of `record` from the environment.
///
/// Fields are resolved in declaration order: the environment variable wins
/// when present (even when set to the empty string), otherwise the declared
/// default applies, otherwise the empty string.
///
/// Loading is NOT atomic: when a field fails to parse the error propagates
/// immediately, leaving every earlier field already written and every later
/// field untouched.
pub fn load<R: EnvRecord>(record: &mut R) -> Result<(), ConfigError> {
    for spec in R::FIELDS {
        let raw = resolve_raw(spec.env, spec.default);
        (spec.get_mut)(record).fill(&raw, spec.env, spec.secret)?;
    }
    Ok(())
}

/// Caller-owned gate ensuring a record is loaded at most once.
///
/// One gate guards one record: reusing a gate across two different records
/// means only the record passed first is ever populated. The gate is
/// `const`-constructible so it can live in a `static` next to the record it
/// guards.
pub struct LoadGate {
    fired: Mutex<bool>,
}

impl LoadGate {
    /// Create a gate that has not fired yet.
    pub const fn new() -> Self {
        Self {
            fired: Mutex::new(false),
        }
    }

    /// Whether the gate has fired (a load ran, successfully or not).
    pub fn has_fired(&self) -> bool {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.fired.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `action` unless the gate already fired, marking it fired either
    /// way. Concurrent callers block until the first one completes.
    fn fire<F>(&self, action: F) -> Result<(), ConfigError>
    where
        F: FnOnce() -> Result<(), ConfigError>,
    {
        let mut fired = self.lock();
        if *fired {
            debug!("load gate already fired, skipping environment read");
            return Ok(());
        }
        // Marked before running so a panicking load cannot re-arm the gate.
        *fired = true;
        action()
    }
}

impl Default for LoadGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Load `record` from the environment at most once per `gate`.
///
/// With `test_mode` set the load is skipped entirely and a warning is
/// emitted; the record keeps whatever values the caller preset. Otherwise
/// the first call through `gate` performs [`load`] and every later call
/// returns `Ok(())` without re-reading the environment, blocking only while
/// the first load is still in progress. A failed load still counts as
/// fired: the error reaches the first caller only.
pub fn load_once<R: EnvRecord>(
    record: &mut R,
    test_mode: bool,
    gate: &LoadGate,
) -> Result<(), ConfigError> {
    if test_mode {
        warn!("test mode active, configuration not loaded from environment");
        return Ok(());
    }
    gate.fire(|| load(record))
}

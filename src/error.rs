//! Error types for configuration loading and reporting.
//!
//! Responsibilities:
//! - Define error variants for value coercion and report output failures.
//!
//! Does NOT handle:
//! - Schema errors: the supported field-type set and the required `env` key
//!   are enforced at compile time by `env_record!` (see field.rs).
//!
//! Invariants:
//! - Parse errors carry the offending env var and raw value for diagnostics.
//! - Parse errors for secret fields NEVER include the raw value.

use thiserror::Error;

/// Errors that can occur while loading or reporting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A raw string could not be coerced to its field's declared type.
    ///
    /// Configuration is not expected to change within a process lifetime, so
    /// this is not retried; fix the environment and restart.
    #[error("invalid value for {var}: cannot parse {raw:?} as {expected}")]
    Parse {
        /// Environment variable the raw value was resolved for.
        var: String,
        /// The offending raw value (masked for secret fields).
        raw: String,
        /// Description of the expected type.
        expected: &'static str,
    },

    /// Writing the rendered report to the output stream failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

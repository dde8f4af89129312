//! Typed environment-variable configuration for long-lived processes.
//!
//! This crate loads typed values from the process environment into a
//! statically declared record, applying declared defaults, and renders a
//! column-aligned report of the loaded values with secret redaction.
//!
//! A record is declared with [`env_record!`], which generates the struct
//! together with a compile-time field descriptor table. Loading goes through
//! [`load_once`], guarded by a caller-owned [`LoadGate`] so the environment
//! is read at most once per process; [`print`] renders the redacted report.
//!
//! ```no_run
//! use envstore::{LoadGate, load_once, print};
//!
//! envstore::env_record! {
//!     #[derive(Debug, Default)]
//!     pub struct ServerConfig {
//!         port: i32 => { env: "PORT", default: "8080" },
//!         api_key: String => { env: "API_KEY", secret: true },
//!         peers: Vec<String> => { env: "PEERS" },
//!     }
//! }
//!
//! static GATE: LoadGate = LoadGate::new();
//!
//! fn main() -> Result<(), envstore::ConfigError> {
//!     let mut config = ServerConfig::default();
//!     load_once(&mut config, false, &GATE)?;
//!     print(&config)?;
//!     Ok(())
//! }
//! ```

mod env;
mod error;
mod field;
mod loader;
mod report;

pub use error::ConfigError;
pub use field::{EnvRecord, FieldSlot, FieldSpec, FieldType, FieldValue};
pub use loader::{LoadGate, load, load_once};
pub use report::{MASK, print, render, write_report};

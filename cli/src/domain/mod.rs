//! Domain layer: bootstrap types, errors and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod probe;
pub mod session;

pub use config::{ping_path, validate_launcher_config};
pub use error::{BootstrapError, ConfigError, ExecError, ResolveError, TransportError};
pub use probe::ProbeRequest;
pub use session::{BootstrapPhase, BootstrapReport, BootstrapSession};

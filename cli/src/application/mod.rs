//! Application layer: ports and the services built on them.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    CommandExecutor, CommandRunner, ConfigStore, HttpTransport, MachineResolver, OutputPublisher,
    ProgressReporter, ReadinessProbe,
};

//! Infrastructure layer: adapters implementing the application ports.
//!
//! This module contains all I/O-performing code: process execution, HTTP,
//! Valkey publishing, and configuration/registry files.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod executor;
pub mod http;
pub mod registry;
pub mod valkey;

pub use command_runner::TokioCommandRunner;
pub use config::YamlConfigStore;
pub use executor::{MultipassExecutor, OUTPUT_BACKLOG};
pub use http::ReqwestTransport;
pub use registry::YamlMachineRegistry;
pub use valkey::ValkeyPublisher;

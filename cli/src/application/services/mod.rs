//! Use cases, composed from domain logic and port calls.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod bootstrap;
pub mod readiness;

pub use bootstrap::{BootstrapSettings, BootstrapSupervisor};
pub use readiness::{HttpReadinessProbe, ReadinessCheck, check_workspace};

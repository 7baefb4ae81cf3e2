//! Collaborator contracts of the bootstrap and readiness services.
//!
//! This file imports only from `crate::domain` and `wsagent_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.
//!
//! All methods take `&self`: one collaborator instance may serve several
//! concurrent bootstrap attempts.

use std::future::Future;
use std::path::PathBuf;
use std::process::Output;

use anyhow::Result;
use wsagent_common::{CommandDescriptor, LauncherConfig, Machine};

use crate::domain::{ExecError, ProbeRequest, ResolveError, TransportError};

// ── Provisioning Ports ────────────────────────────────────────────────────────

/// Resolves a workspace to the machine it runs on.
#[allow(async_fn_in_trait)]
pub trait MachineResolver {
    /// Look up the running machine of `workspace_id`.
    async fn resolve(&self, workspace_id: &str) -> Result<Machine, ResolveError>;
}

/// Launches commands inside machines.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor {
    /// Start `command` inside `machine_id`, streaming its output to `channel`.
    ///
    /// Returns once the launch is accepted or rejected; process completion
    /// is never awaited.
    async fn exec(
        &self,
        machine_id: &str,
        command: &CommandDescriptor,
        channel: &str,
    ) -> Result<(), ExecError>;
}

/// Publishes process output lines to a pub/sub channel.
///
/// The returned future is `Send` so publishing can run on a spawned task.
pub trait OutputPublisher {
    fn publish(&self, channel: &str, message: &str) -> impl Future<Output = Result<()>> + Send;
}

// ── Readiness Ports ───────────────────────────────────────────────────────────

/// Sends one HTTP request and reports the status code.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn send(&self, request: &ProbeRequest) -> Result<u16, TransportError>;
}

/// Checks once whether the workspace agent answers.
#[allow(async_fn_in_trait)]
pub trait ReadinessProbe {
    /// Exactly one round trip. Expected network failures yield `false`.
    async fn probe(&self, request: &ProbeRequest) -> bool;
}

// ── Process Ports ────────────────────────────────────────────────────────────

/// Host process execution, so the Multipass adapter can be driven by mocks.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or outlives the
    /// runner's timeout. A timed-out process is killed, never orphaned.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Start a long-lived program with piped stdout/stderr without waiting
    /// for it.
    ///
    /// The process is detached from the handle: dropping the returned child,
    /// or shutting down the runtime that owns it, leaves the process running.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn launch(&self, program: &str, args: &[&str]) -> Result<tokio::process::Child>;
}

// ── Presentation Ports ───────────────────────────────────────────────────────

/// User-facing progress of a bootstrap attempt. Never used for diagnostics;
/// those go through `tracing`.
pub trait ProgressReporter {
    fn step(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts launcher configuration loading.
pub trait ConfigStore {
    /// Load the effective configuration (file, then environment overrides).
    fn load(&self) -> Result<LauncherConfig>;
    /// Path of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

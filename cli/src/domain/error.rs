//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Bootstrap errors ──────────────────────────────────────────────────────────

/// Terminal failure of one workspace agent bootstrap attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    #[error("Workspace '{workspace_id}' has no running machine.")]
    NotFound { workspace_id: String },

    #[error("Workspace agent launch was rejected: {reason}")]
    LaunchRejected { reason: String },

    #[error("Workspace agent is not responding. Workspace {workspace_id} will be stopped")]
    NotResponding { workspace_id: String },

    #[error("Workspace agent bootstrap was cancelled.")]
    Cancelled,

    #[error("Machine '{machine_id}' exposes no server on port {port}.")]
    MissingServer { machine_id: String, port: String },

    #[error("Machine server URL '{url}' is invalid: {reason}")]
    BadServerUrl { url: String, reason: String },

    #[error("Machine error: {0}")]
    Machine(String),
}

impl BootstrapError {
    /// Stable machine-readable code for `--json` output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::LaunchRejected { .. } => "LAUNCH_REJECTED",
            Self::NotResponding { .. } => "NOT_RESPONDING",
            Self::Cancelled => "CANCELLED",
            Self::MissingServer { .. } => "MISSING_SERVER",
            Self::BadServerUrl { .. } => "BAD_SERVER_URL",
            Self::Machine(_) => "MACHINE_ERROR",
        }
    }

    /// Whether the caller must stop the workspace after this failure.
    #[must_use]
    pub fn requires_stop(&self) -> bool {
        matches!(self, Self::NotResponding { .. })
    }
}

// ── Collaborator errors ───────────────────────────────────────────────────────

/// Failure to resolve a workspace to its machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no machine registered for workspace '{0}'")]
    NotFound(String),

    #[error("machine registry unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous rejection of a command launch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("machine '{0}' not found")]
    MachineNotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Transport-level failure of a single HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("protocol error: {0}")]
    Protocol(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to launcher configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}

//! Readiness probing of the workspace agent.
//!
//! Imports only from `crate::domain` and `crate::application`.

use crate::application::ports::{HttpTransport, MachineResolver, ReadinessProbe};
use crate::application::services::bootstrap::{BootstrapSettings, resolve_machine};
use crate::domain::{BootstrapError, ProbeRequest};

/// Status code that marks the agent as ready. Nothing else counts.
pub const READY_STATUS: u16 = 200;

/// Readiness probe over an [`HttpTransport`].
///
/// Connection failures, timeouts, protocol errors and non-200 statuses all
/// report `false`. The request timeout is enforced here as well, so a
/// transport that ignores it still cannot stall the poll loop.
pub struct HttpReadinessProbe<T> {
    transport: T,
}

impl<T: HttpTransport> HttpReadinessProbe<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: HttpTransport> ReadinessProbe for HttpReadinessProbe<T> {
    async fn probe(&self, request: &ProbeRequest) -> bool {
        match tokio::time::timeout(request.timeout, self.transport.send(request)).await {
            Ok(Ok(READY_STATUS)) => true,
            Ok(Ok(status)) => {
                tracing::trace!(url = %request.url, status, "workspace agent answered but is not ready");
                false
            }
            Ok(Err(e)) => {
                tracing::trace!(url = %request.url, error = %e, "workspace agent unreachable");
                false
            }
            Err(_) => {
                tracing::trace!(url = %request.url, timeout = ?request.timeout, "workspace agent probe timed out");
                false
            }
        }
    }
}

/// Outcome of a one-off readiness check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReadinessCheck {
    pub workspace_id: String,
    pub machine_id: String,
    pub probe_url: String,
    pub ready: bool,
}

/// Probe the agent of `workspace_id` once, without launching anything.
///
/// # Errors
///
/// Returns an error if the workspace cannot be resolved or its machine does
/// not expose a usable agent server.
pub async fn check_workspace(
    resolver: &impl MachineResolver,
    prober: &impl ReadinessProbe,
    settings: &BootstrapSettings,
    workspace_id: &str,
) -> Result<ReadinessCheck, BootstrapError> {
    let machine = resolve_machine(resolver, workspace_id).await?;
    let request = settings.probe_request(&machine)?;
    let ready = prober.probe(&request).await;
    Ok(ReadinessCheck {
        workspace_id: workspace_id.to_string(),
        machine_id: machine.id,
        probe_url: request.url.to_string(),
        ready,
    })
}

//! Workspace agent bootstrap.
//!
//! Starts the workspace agent inside the workspace's machine, then polls its
//! API root until it answers or the start budget runs out.
//!
//! Imports only from `crate::domain`, `crate::application::ports` and
//! `wsagent_common`. All I/O is routed through injected port traits.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use wsagent_common::{
    CommandDescriptor, LauncherConfig, Machine, ProbeMethod, WS_AGENT_PORT, agent_output_channel,
};

use crate::application::ports::{
    CommandExecutor, MachineResolver, ProgressReporter, ReadinessProbe,
};
use crate::domain::{
    BootstrapError, BootstrapPhase, BootstrapReport, BootstrapSession, ConfigError, ExecError,
    ProbeRequest, ResolveError, ping_path, validate_launcher_config,
};

/// Values fixed for the lifetime of a supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSettings {
    pub start_command: String,
    /// Probe path, always ending with `/`.
    pub ping_path: String,
    pub probe_method: ProbeMethod,
    pub max_start_time: Duration,
    pub ping_delay: Duration,
    pub ping_timeout: Duration,
}

impl BootstrapSettings {
    /// Derive settings from a launcher configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn from_config(config: &LauncherConfig) -> Result<Self, ConfigError> {
        validate_launcher_config(config)?;
        Ok(Self {
            start_command: config.start_command.clone(),
            ping_path: ping_path(&config.api_endpoint)?,
            probe_method: config.probe_method,
            max_start_time: config.max_start_time(),
            ping_delay: config.ping_delay(),
            ping_timeout: config.ping_timeout(),
        })
    }

    /// Probe request targeting the agent server of `machine`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::MissingServer`] if the machine does not expose
    /// the agent port, or [`BootstrapError::BadServerUrl`] if its URL is unusable.
    pub fn probe_request(&self, machine: &Machine) -> Result<ProbeRequest, BootstrapError> {
        let server = machine
            .server(WS_AGENT_PORT)
            .ok_or_else(|| BootstrapError::MissingServer {
                machine_id: machine.id.clone(),
                port: WS_AGENT_PORT.to_string(),
            })?;
        ProbeRequest::for_server(server, &self.ping_path, self.probe_method, self.ping_timeout)
    }
}

/// Resolve `workspace_id`, mapping registry failures onto bootstrap errors.
pub(crate) async fn resolve_machine(
    resolver: &impl MachineResolver,
    workspace_id: &str,
) -> Result<Machine, BootstrapError> {
    resolver
        .resolve(workspace_id)
        .await
        .map_err(|e| match e {
            ResolveError::NotFound(_) => BootstrapError::NotFound {
                workspace_id: workspace_id.to_string(),
            },
            ResolveError::Unavailable(reason) => BootstrapError::Machine(reason),
        })
}

/// Starts the workspace agent and waits for it to become reachable.
///
/// Holds only read-only settings and shared collaborators, so one supervisor
/// can run any number of concurrent attempts for different workspaces.
pub struct BootstrapSupervisor<'a, R, E, P> {
    resolver: &'a R,
    executor: &'a E,
    prober: &'a P,
    settings: BootstrapSettings,
}

impl<'a, R, E, P> BootstrapSupervisor<'a, R, E, P>
where
    R: MachineResolver,
    E: CommandExecutor,
    P: ReadinessProbe,
{
    pub fn new(resolver: &'a R, executor: &'a E, prober: &'a P, settings: BootstrapSettings) -> Self {
        Self {
            resolver,
            executor,
            prober,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &BootstrapSettings {
        &self.settings
    }

    /// Run one bootstrap attempt for `workspace_id`.
    ///
    /// The start command is dispatched exactly once, before the first probe.
    /// Probes run sequentially, `ping_delay` apart, while less than
    /// `max_start_time` has elapsed since polling began.
    ///
    /// # Errors
    ///
    /// - [`BootstrapError::NotFound`] when the workspace has no machine.
    /// - [`BootstrapError::LaunchRejected`] when the executor rejects the command.
    /// - [`BootstrapError::MissingServer`] / [`BootstrapError::BadServerUrl`]
    ///   when the agent endpoint cannot be derived.
    /// - [`BootstrapError::NotResponding`] when the budget runs out; the caller
    ///   must stop the workspace.
    /// - [`BootstrapError::Cancelled`] when `cancel` fires before a probe or
    ///   during the delay between probes.
    pub async fn bootstrap(
        &self,
        workspace_id: &str,
        reporter: &impl ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<BootstrapReport, BootstrapError> {
        let mut session = BootstrapSession::new(workspace_id, self.settings.max_start_time);

        let machine = resolve_machine(self.resolver, workspace_id).await?;
        let channel = agent_output_channel(workspace_id);

        reporter.step("starting workspace agent...");
        let command = CommandDescriptor::ws_agent(&self.settings.start_command);
        if let Err(e) = self.executor.exec(&machine.id, &command, &channel).await {
            session.enter(BootstrapPhase::Rejected);
            tracing::warn!(workspace_id, machine_id = %machine.id, error = %e, "workspace agent launch failed");
            return Err(match e {
                ExecError::BadRequest(reason) => BootstrapError::LaunchRejected { reason },
                ExecError::MachineNotFound(_) => BootstrapError::NotFound {
                    workspace_id: workspace_id.to_string(),
                },
                ExecError::Internal(reason) => BootstrapError::Machine(reason),
            });
        }
        session.enter(BootstrapPhase::CommandDispatched);

        let request = match self.settings.probe_request(&machine) {
            Ok(request) => request,
            Err(e) => {
                session.enter(BootstrapPhase::Rejected);
                return Err(e);
            }
        };

        session.enter(BootstrapPhase::Polling);
        reporter.step("waiting for workspace agent...");
        let started = Instant::now();
        tracing::debug!(
            workspace_id,
            url = %request.url,
            method = request.method.as_str(),
            "starts pinging workspace agent"
        );

        while session.within_budget(started.elapsed()) {
            if cancel.is_cancelled() {
                return Err(BootstrapError::Cancelled);
            }

            let ready = self.prober.probe(&request).await;
            session.record_probe(ready);
            if ready {
                session.enter(BootstrapPhase::Ready);
                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                tracing::info!(
                    workspace_id,
                    probes = session.probes(),
                    elapsed_ms,
                    "workspace agent is ready"
                );
                reporter.success("workspace agent ready");
                return Ok(BootstrapReport {
                    workspace_id: workspace_id.to_string(),
                    machine_id: machine.id,
                    channel,
                    probe_url: request.url.to_string(),
                    probes: session.probes(),
                    elapsed_ms,
                });
            }
            tracing::trace!(workspace_id, attempt = session.probes(), "workspace agent not ready yet");

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!(workspace_id, "bootstrap cancelled while waiting");
                    return Err(BootstrapError::Cancelled);
                }
                () = tokio::time::sleep(self.settings.ping_delay) => {}
            }
        }

        session.enter(BootstrapPhase::TimedOut);
        tracing::warn!(
            workspace_id,
            probes = session.probes(),
            budget = ?self.settings.max_start_time,
            "workspace agent did not answer in time"
        );
        Err(BootstrapError::NotResponding {
            workspace_id: workspace_id.to_string(),
        })
    }
}

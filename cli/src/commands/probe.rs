//! `wsagent probe` runs one readiness check without launching anything.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::{HttpReadinessProbe, check_workspace};
use crate::commands::report_failure;
use crate::infra::ReqwestTransport;
use crate::output::json;

/// Arguments for the probe command.
#[derive(Args)]
pub struct ProbeArgs {
    /// Workspace identifier
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub workspace_id: String,
}

/// Run the probe command. Exits 0 when the agent is ready, 1 otherwise.
///
/// # Errors
///
/// Returns an error if a collaborator cannot be constructed.
pub async fn run(app: &AppContext, args: &ProbeArgs) -> Result<ExitCode> {
    let settings = app.settings()?;
    let registry = app.machine_registry()?;
    let prober = HttpReadinessProbe::new(ReqwestTransport::new(settings.ping_timeout)?);

    let check = match check_workspace(&registry, &prober, &settings, &args.workspace_id).await {
        Ok(check) => check,
        Err(e) => return report_failure(app, &e),
    };

    if app.is_json() {
        println!("{}", json::format_value(&check)?);
    } else if check.ready {
        app.output.success(&format!("workspace agent ready at {}", check.probe_url));
    } else {
        app.output
            .warn(&format!("workspace agent not ready at {}", check.probe_url));
    }

    Ok(if check.ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

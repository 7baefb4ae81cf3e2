//! `wsagent bootstrap` launches the workspace agent and waits until it answers.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::application::services::{BootstrapSupervisor, HttpReadinessProbe};
use crate::commands::report_failure;
use crate::domain::BootstrapReport;
use crate::infra::{MultipassExecutor, ReqwestTransport, TokioCommandRunner, ValkeyPublisher};
use crate::output::{NullReporter, TerminalReporter, json};

/// Arguments for the bootstrap command.
#[derive(Args)]
pub struct BootstrapArgs {
    /// Workspace identifier
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub workspace_id: String,

    /// Override the start budget for this run, in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_start_time_ms: Option<u64>,
}

/// Run the bootstrap command.
///
/// `Ctrl-C` cancels the attempt while it waits between probes.
///
/// # Errors
///
/// Returns an error if a collaborator cannot be constructed.
pub async fn run(app: &AppContext, args: &BootstrapArgs) -> Result<ExitCode> {
    let mut settings = app.settings()?;
    if let Some(ms) = args.max_start_time_ms {
        settings.max_start_time = Duration::from_millis(ms);
    }

    let registry = app.machine_registry()?;
    let publisher = ValkeyPublisher::new(&app.config.valkey_url)?;
    let executor = MultipassExecutor::new(TokioCommandRunner::default(), publisher);
    let prober = HttpReadinessProbe::new(ReqwestTransport::new(settings.ping_timeout)?);
    let supervisor = BootstrapSupervisor::new(&registry, &executor, &prober, settings);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("interrupt received");
                cancel.cancel();
            }
        })
    };

    let result = if app.is_json() {
        supervisor
            .bootstrap(&args.workspace_id, &NullReporter, &cancel)
            .await
    } else {
        let reporter = TerminalReporter::new(&app.output);
        let result = supervisor
            .bootstrap(&args.workspace_id, &reporter, &cancel)
            .await;
        if result.is_err() {
            reporter.clear();
        }
        result
    };
    interrupt.abort();

    match result {
        Ok(report) => {
            render_report(app, &report)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => report_failure(app, &e),
    }
}

fn render_report(app: &AppContext, report: &BootstrapReport) -> Result<()> {
    if app.is_json() {
        println!("{}", json::format_value(report)?);
        return Ok(());
    }
    let ctx = &app.output;
    ctx.kv("workspace", &report.workspace_id);
    ctx.kv("machine  ", &report.machine_id);
    ctx.kv("endpoint ", &report.probe_url);
    ctx.kv("output   ", &report.channel);
    ctx.kv(
        "started  ",
        &format!("{} probe(s), {} ms", report.probes, report.elapsed_ms),
    );
    Ok(())
}

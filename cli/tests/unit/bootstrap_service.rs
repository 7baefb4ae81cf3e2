//! Unit tests for the bootstrap supervisor.
//!
//! All tests run on a paused clock: sleeps advance virtual time instantly,
//! so elapsed-time assertions are exact.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use wsagent_cli::application::services::BootstrapSupervisor;
use wsagent_cli::domain::{BootstrapError, ExecError};
use wsagent_cli::output::NullReporter;
use wsagent_common::{Machine, ServerDescriptor};

use crate::mocks::{
    BrokenResolver, MapResolver, RecordingExecutor, RecordingReporter, ScriptedProbe, machine,
    settings,
};

// ── Scenario A: ready on the fifth probe ─────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_ready_on_fifth_probe_returns_report() {
    let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::ready_on(5);
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(5000, 1000));

    let origin = Instant::now();
    let report = supervisor
        .bootstrap("ws1", &NullReporter, &CancellationToken::new())
        .await
        .expect("agent should become ready");

    assert_eq!(probe.count(), 5);
    assert_eq!(report.probes, 5);
    assert_eq!(report.elapsed_ms, 4000);
    assert_eq!(probe.offsets_ms(origin), vec![0, 1000, 2000, 3000, 4000]);
    assert_eq!(report.machine_id, "m1");
    assert_eq!(report.channel, "workspace:ws1:ext-server:output");
    assert_eq!(report.probe_url, "http://10.0.0.1:32768/api/");
}

#[tokio::test(start_paused = true)]
async fn test_ready_on_first_probe_does_not_sleep() {
    let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::ready_on(1);
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(5000, 1000));

    let origin = Instant::now();
    let report = supervisor
        .bootstrap("ws1", &NullReporter, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.probes, 1);
    assert_eq!(origin.elapsed(), Duration::ZERO);
}

// ── Scenario B: never ready ──────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_never_ready_times_out_after_three_probes() {
    let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::never();
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(3000, 1000));

    let origin = Instant::now();
    let err = supervisor
        .bootstrap("ws1", &NullReporter, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BootstrapError::NotResponding {
            workspace_id: "ws1".into()
        }
    );
    assert!(err.requires_stop());
    assert_eq!(probe.count(), 3);
    assert_eq!(origin.elapsed(), Duration::from_millis(3000));
    assert_eq!(executor.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_probe_starts_at_or_after_deadline() {
    let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::never();
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(2500, 700));

    let origin = Instant::now();
    let _ = supervisor
        .bootstrap("ws1", &NullReporter, &CancellationToken::new())
        .await;

    let offsets = probe.offsets_ms(origin);
    assert_eq!(offsets, vec![0, 700, 1400, 2100]);
    assert!(offsets.iter().all(|ms| *ms < 2500));
}

#[tokio::test(start_paused = true)]
async fn test_probe_count_bounded_by_budget_over_delay() {
    for (max, delay) in [
        (1000, 1000),
        (1000, 300),
        (2500, 700),
        (10_000, 2000),
        (10_000, 3000),
        (1, 2000),
    ] {
        let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
        let executor = RecordingExecutor::default();
        let probe = ScriptedProbe::never();
        let supervisor =
            BootstrapSupervisor::new(&resolver, &executor, &probe, settings(max, delay));
        let _ = supervisor
            .bootstrap("ws1", &NullReporter, &CancellationToken::new())
            .await;
        let lower = usize::try_from(max / delay).unwrap().max(1);
        let upper = usize::try_from(max.div_ceil(delay)).unwrap();
        assert!(probe.count() >= lower, "max={max} delay={delay}");
        assert!(probe.count() <= upper, "max={max} delay={delay}");
    }
}

// ── Scenario C: unknown workspace ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_unknown_workspace_is_not_found_without_side_effects() {
    let resolver = MapResolver::default();
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::never();
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(5000, 1000));

    let err = supervisor
        .bootstrap("ghost", &NullReporter, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BootstrapError::NotFound {
            workspace_id: "ghost".into()
        }
    );
    assert_eq!(executor.call_count(), 0);
    assert_eq!(probe.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_registry_is_machine_error() {
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::never();
    let supervisor =
        BootstrapSupervisor::new(&BrokenResolver, &executor, &probe, settings(5000, 1000));

    let err = supervisor
        .bootstrap("ws1", &NullReporter, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "MACHINE_ERROR");
    assert_eq!(executor.call_count(), 0);
}

// ── Scenario D: launch rejected ──────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_rejected_launch_is_surfaced_without_probing() {
    let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
    let executor = RecordingExecutor::rejecting(ExecError::BadRequest("bad command".into()));
    let probe = ScriptedProbe::never();
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(5000, 1000));

    let err = supervisor
        .bootstrap("ws1", &NullReporter, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BootstrapError::LaunchRejected {
            reason: "bad command".into()
        }
    );
    assert!(!err.requires_stop());
    assert_eq!(probe.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_machine_gone_at_exec_is_not_found() {
    let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
    let executor = RecordingExecutor::rejecting(ExecError::MachineNotFound("m1".into()));
    let probe = ScriptedProbe::never();
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(5000, 1000));

    let err = supervisor
        .bootstrap("ws1", &NullReporter, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(probe.count(), 0);
}

// ── Dispatch ─────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_dispatches_agent_command_once_to_output_channel() {
    let resolver = MapResolver::default().with("abc123", machine("m7", "10.0.0.7"));
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::ready_on(3);
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(5000, 1000));

    supervisor
        .bootstrap("abc123", &NullReporter, &CancellationToken::new())
        .await
        .unwrap();

    let calls = executor.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].machine_id, "m7");
    assert_eq!(calls[0].channel, "workspace:abc123:ext-server:output");
    assert_eq!(calls[0].command.name, "CheWsAgent");
    assert_eq!(calls[0].command.kind, "Arbitrary");
    assert_eq!(
        calls[0].command.command_line,
        supervisor.settings().start_command
    );
}

#[tokio::test(start_paused = true)]
async fn test_machine_without_agent_server_fails_before_probing() {
    let resolver = MapResolver::default().with(
        "ws1",
        Machine::new("m1").with_server("8080", ServerDescriptor::new("http://10.0.0.1:8080/")),
    );
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::ready_on(1);
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(5000, 1000));

    let err = supervisor
        .bootstrap("ws1", &NullReporter, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "MISSING_SERVER");
    assert_eq!(executor.call_count(), 1);
    assert_eq!(probe.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reporter_sees_steps_and_success() {
    let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::ready_on(2);
    let reporter = RecordingReporter::default();
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(5000, 1000));

    supervisor
        .bootstrap("ws1", &reporter, &CancellationToken::new())
        .await
        .unwrap();

    let events = reporter.events();
    assert!(events.first().unwrap().starts_with("step:"));
    assert_eq!(events.last().unwrap(), "success: workspace agent ready");
}

// ── Cancellation ─────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_cancel_during_delay_stops_promptly() {
    let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::never();
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(10_000, 1000));
    let cancel = CancellationToken::new();

    let origin = Instant::now();
    let (result, ()) = tokio::join!(
        supervisor.bootstrap("ws1", &NullReporter, &cancel),
        async {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            cancel.cancel();
        }
    );

    assert_eq!(result.unwrap_err(), BootstrapError::Cancelled);
    assert_eq!(probe.count(), 2);
    assert_eq!(origin.elapsed(), Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_polling_issues_no_probe() {
    let resolver = MapResolver::default().with("ws1", machine("m1", "10.0.0.1"));
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::ready_on(1);
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(5000, 1000));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = supervisor
        .bootstrap("ws1", &NullReporter, &cancel)
        .await
        .unwrap_err();

    assert_eq!(err, BootstrapError::Cancelled);
    assert_eq!(err.code(), "CANCELLED");
    assert_eq!(probe.count(), 0);
}

// ── Concurrency ──────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_concurrent_attempts_are_independent() {
    let resolver = MapResolver::default()
        .with("fast", machine("m-fast", "10.0.0.1"))
        .with("slow", machine("m-slow", "10.0.0.2"));
    let executor = RecordingExecutor::default();
    let probe = ScriptedProbe::new(|req, _| req.url.host_str() == Some("10.0.0.1"));
    let supervisor = BootstrapSupervisor::new(&resolver, &executor, &probe, settings(3000, 1000));
    let cancel = CancellationToken::new();

    let (fast, slow) = tokio::join!(
        supervisor.bootstrap("fast", &NullReporter, &cancel),
        supervisor.bootstrap("slow", &NullReporter, &cancel),
    );

    let fast = fast.unwrap();
    assert_eq!(fast.probes, 1);
    assert_eq!(fast.machine_id, "m-fast");
    assert_eq!(slow.unwrap_err().code(), "NOT_RESPONDING");
    assert_eq!(executor.call_count(), 2);

    let slow_probes = probe
        .attempts
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, url)| url.contains("10.0.0.2"))
        .count();
    assert_eq!(slow_probes, 3);
}

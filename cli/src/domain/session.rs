//! Bootstrap attempt bookkeeping: phase state machine and poll budget.
//!
//! Callers measure time themselves and pass elapsed durations in, so this
//! module stays free of clocks.

use std::time::Duration;

use serde::Serialize;

/// Phase of one bootstrap attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapPhase {
    Init,
    CommandDispatched,
    Polling,
    Ready,
    TimedOut,
    Rejected,
}

impl BootstrapPhase {
    /// Whether `next` is reachable from `self` in one step.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::CommandDispatched | Self::Rejected)
                | (Self::CommandDispatched, Self::Polling | Self::Rejected)
                | (Self::Polling, Self::Ready | Self::TimedOut)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::TimedOut | Self::Rejected)
    }
}

/// State of one bootstrap attempt. Never shared between attempts.
#[derive(Debug)]
pub struct BootstrapSession {
    workspace_id: String,
    phase: BootstrapPhase,
    max_start_time: Duration,
    probes: u32,
    last_ready: Option<bool>,
}

impl BootstrapSession {
    #[must_use]
    pub fn new(workspace_id: &str, max_start_time: Duration) -> Self {
        Self {
            workspace_id: workspace_id.to_string(),
            phase: BootstrapPhase::Init,
            max_start_time,
            probes: 0,
            last_ready: None,
        }
    }

    #[must_use]
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    #[must_use]
    pub fn phase(&self) -> BootstrapPhase {
        self.phase
    }

    /// Move to `next`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics on a transition the state machine does not allow.
    pub fn enter(&mut self, next: BootstrapPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal bootstrap transition {:?} -> {next:?}",
            self.phase
        );
        self.phase = next;
    }

    /// Whether another probe may be issued after `elapsed` since polling began.
    #[must_use]
    pub fn within_budget(&self, elapsed: Duration) -> bool {
        elapsed < self.max_start_time
    }

    pub fn record_probe(&mut self, ready: bool) {
        self.probes += 1;
        self.last_ready = Some(ready);
    }

    #[must_use]
    pub fn probes(&self) -> u32 {
        self.probes
    }

    #[must_use]
    pub fn last_ready(&self) -> Option<bool> {
        self.last_ready
    }
}

/// Summary of a successful bootstrap, rendered by `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub workspace_id: String,
    pub machine_id: String,
    pub channel: String,
    pub probe_url: String,
    pub probes: u32,
    pub elapsed_ms: u64,
}

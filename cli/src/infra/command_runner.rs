//! Infrastructure implementation of the `CommandRunner` port.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};

use crate::application::ports::CommandRunner;

/// Default timeout for short multipass CLI calls such as `multipass info`.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs host processes on the tokio runtime.
///
/// Children of `run` are spawned with `kill_on_drop`, so a run abandoned at
/// its timeout takes the process down with it. Children of `launch` are not:
/// they keep running after the launcher exits.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

fn piped(program: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn spawn(mut cmd: Command, program: &str) -> Result<Child> {
    cmd.spawn()
        .with_context(|| format!("failed to spawn {program}"))
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let mut cmd = piped(program, args);
        cmd.kill_on_drop(true);
        let child = spawn(cmd, program)?;
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output.with_context(|| format!("waiting for {program}")),
            Err(_) => anyhow::bail!(
                "{program} timed out after {}ms",
                self.timeout.as_millis()
            ),
        }
    }

    fn launch(&self, program: &str, args: &[&str]) -> Result<Child> {
        let mut cmd = piped(program, args);
        // Own process group: a Ctrl-C aimed at the launcher must not reach it.
        #[cfg(unix)]
        cmd.process_group(0);
        spawn(cmd, program)
    }
}

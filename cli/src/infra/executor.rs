//! Infrastructure implementation of the `CommandExecutor` port.
//!
//! `MultipassExecutor` launches commands inside Multipass instances with
//! `multipass exec` and forwards their output, line by line, to a pub/sub
//! channel through an `OutputPublisher`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use wsagent_common::CommandDescriptor;

use crate::application::ports::{CommandExecutor, CommandRunner, OutputPublisher};
use crate::domain::ExecError;

/// Multipass-backed executor, generic over process runner and publisher so
/// tests can inject mocks.
pub struct MultipassExecutor<R, P> {
    runner: R,
    publisher: P,
}

impl<R, P> MultipassExecutor<R, P>
where
    R: CommandRunner,
    P: OutputPublisher + Clone + Send + Sync + 'static,
{
    pub fn new(runner: R, publisher: P) -> Self {
        Self { runner, publisher }
    }

    /// Confirm the instance exists before launching anything in it.
    async fn check_machine(&self, machine_id: &str) -> Result<(), ExecError> {
        let output = self
            .runner
            .run("multipass", &["info", machine_id, "--format", "json"])
            .await
            .map_err(|e| ExecError::Internal(format!("{e:#}")))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("does not exist") {
            return Err(ExecError::MachineNotFound(machine_id.to_string()));
        }
        Err(ExecError::Internal(format!(
            "multipass info {machine_id} failed: {}",
            stderr.trim()
        )))
    }
}

/// Reject descriptors that can never start a process.
fn validate_descriptor(command: &CommandDescriptor) -> Result<(), ExecError> {
    if command.name.trim().is_empty() {
        return Err(ExecError::BadRequest("command name must not be empty".to_string()));
    }
    if command.command_line.trim().is_empty() {
        return Err(ExecError::BadRequest(format!(
            "command '{}' has an empty command line",
            command.name
        )));
    }
    Ok(())
}

impl<R, P> CommandExecutor for MultipassExecutor<R, P>
where
    R: CommandRunner,
    P: OutputPublisher + Clone + Send + Sync + 'static,
{
    async fn exec(
        &self,
        machine_id: &str,
        command: &CommandDescriptor,
        channel: &str,
    ) -> Result<(), ExecError> {
        validate_descriptor(command)?;
        self.check_machine(machine_id).await?;

        let child = self
            .runner
            .launch(
                "multipass",
                &["exec", machine_id, "--", "sh", "-c", &command.command_line],
            )
            .map_err(|e| ExecError::Internal(format!("{e:#}")))?;

        tracing::info!(
            machine_id,
            process = %command.name,
            kind = %command.kind,
            channel,
            "command launched"
        );
        forward_output(child, self.publisher.clone(), channel.to_string());
        Ok(())
    }
}

/// Lines buffered between the pipe readers and the publisher. Once full,
/// further lines are dropped until the publisher catches up.
pub const OUTPUT_BACKLOG: usize = 1024;

/// Publish every stdout/stderr line of `child` to `channel` in the background.
///
/// The task owns the child and lives until the process exits or the runtime
/// shuts down. Publish failures are logged and skipped. The pipes are always
/// drained to EOF, even when lines have to be dropped.
fn forward_output<P>(mut child: Child, publisher: P, channel: String)
where
    P: OutputPublisher + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::channel::<String>(OUTPUT_BACKLOG);
    let dropped = Arc::new(AtomicUsize::new(0));
    if let Some(stdout) = child.stdout.take() {
        read_lines(stdout, "stdout", tx.clone(), Arc::clone(&dropped));
    }
    if let Some(stderr) = child.stderr.take() {
        read_lines(stderr, "stderr", tx.clone(), Arc::clone(&dropped));
    }
    drop(tx);

    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = publisher.publish(&channel, &line).await {
                tracing::warn!(channel = %channel, error = %e, "failed to publish process output");
            }
        }
        let dropped = dropped.load(Ordering::Relaxed);
        if dropped > 0 {
            tracing::warn!(channel = %channel, dropped, "process output lines dropped");
        }
        match child.wait().await {
            Ok(status) => tracing::info!(channel = %channel, %status, "launched process exited"),
            Err(e) => tracing::warn!(channel = %channel, error = %e, "cannot wait for launched process"),
        }
    });
}

fn read_lines<T>(reader: T, stream: &'static str, tx: mpsc::Sender<String>, dropped: Arc<AtomicUsize>)
where
    T: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(strip_line_end(&buf)).into_owned();
                    match tx.try_send(line) {
                        Ok(()) | Err(TrySendError::Closed(_)) => {}
                        Err(TrySendError::Full(_)) => {
                            if dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                                tracing::warn!(stream, "output backlog full, dropping lines");
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(stream, error = %e, "cannot read process output");
                    break;
                }
            }
        }
    });
}

fn strip_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Pub/sub channel names used by the launcher.
pub mod keys {
    /// Prefix shared by every per-workspace channel.
    /// Format: workspace:{workspace_id}:...
    pub const WORKSPACE: &str = "workspace";

    /// Output of the workspace agent process started inside the machine.
    /// Format: workspace:{workspace_id}:ext-server:output
    /// Value: one published message per stdout/stderr line
    pub const EXT_SERVER_OUTPUT: &str = "ext-server:output";
}

/// Channel that carries the workspace agent's process output.
///
/// Consumers subscribe to this exact name, so the format must not change.
#[must_use]
pub fn agent_output_channel(workspace_id: &str) -> String {
    format!(
        "{}:{workspace_id}:{}",
        keys::WORKSPACE,
        keys::EXT_SERVER_OUTPUT
    )
}

use serde::{Deserialize, Serialize};

/// Process name given to the workspace agent inside the machine.
pub const WS_AGENT_PROCESS_NAME: &str = "CheWsAgent";

/// Free-form type tag for commands that are not tied to a project type.
pub const ARBITRARY_COMMAND_TYPE: &str = "Arbitrary";

/// A command to run inside a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub command_line: String,
    /// Classification tag, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl CommandDescriptor {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        command_line: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command_line: command_line.into(),
            kind: kind.into(),
        }
    }

    /// The descriptor used to start the workspace agent.
    #[must_use]
    pub fn ws_agent(command_line: impl Into<String>) -> Self {
        Self::new(WS_AGENT_PROCESS_NAME, command_line, ARBITRARY_COMMAND_TYPE)
    }
}

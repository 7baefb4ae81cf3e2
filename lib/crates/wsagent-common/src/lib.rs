pub mod channels;
pub mod command;
pub mod config;
pub mod machine;

pub use channels::agent_output_channel;
pub use command::{ARBITRARY_COMMAND_TYPE, CommandDescriptor, WS_AGENT_PROCESS_NAME};
pub use config::{LauncherConfig, ProbeMethod};
pub use machine::{Machine, ServerDescriptor, WS_AGENT_PORT};

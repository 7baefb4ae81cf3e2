//! `wsagent channel` prints the output channel of a workspace agent.

use std::process::ExitCode;

use clap::Args;
use wsagent_common::agent_output_channel;

/// Arguments for the channel command.
#[derive(Args)]
pub struct ChannelArgs {
    /// Workspace identifier
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub workspace_id: String,
}

/// Run the channel command.
pub fn run(args: &ChannelArgs, json: bool) -> ExitCode {
    let channel = agent_output_channel(&args.workspace_id);
    if json {
        let obj = serde_json::json!({
            "workspace_id": args.workspace_id,
            "channel": channel,
        });
        println!("{obj}");
    } else {
        println!("{channel}");
    }
    ExitCode::SUCCESS
}

//! Command-line surface of `wsagent`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;
use crate::infra::YamlConfigStore;

/// Start workspace agents inside their machines and wait until they answer
#[derive(Parser)]
#[command(
    name = "wsagent",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Print one JSON document on stdout instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Never use colors
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file [default: ~/.wsagent/config.yaml]
    #[arg(long, global = true, env = "WSAGENT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Launch the workspace agent and wait until it is ready
    Bootstrap(commands::bootstrap::BootstrapArgs),

    /// Check once whether the workspace agent is ready
    Probe(commands::probe::ProbeArgs),

    /// Print the channel carrying the workspace agent's output
    Channel(commands::channel::ChannelArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Print the wsagent version
    Version,
}

impl Cli {
    /// Dispatch to the selected command and return its exit status.
    ///
    /// `version`, `channel` and `config path` never read the config file.
    ///
    /// # Errors
    ///
    /// Only unexpected failures (unreadable configuration, adapters that
    /// cannot be built) surface here; bootstrap outcomes map to exit codes.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            command,
        } = self;
        let store = YamlConfigStore::new(config);
        let flags = OutputFlags {
            no_color,
            quiet,
            json,
        };

        match command {
            Command::Version => Ok(commands::version::run(json)),
            Command::Channel(args) => Ok(commands::channel::run(&args, json)),
            Command::Config(commands::config::ConfigCommand::Path) => {
                commands::config::path(&store, json)
            }
            Command::Config(cmd) => {
                let app = AppContext::new(&flags, &store)?;
                commands::config::run(&app, &cmd)
            }
            Command::Bootstrap(args) => {
                let app = AppContext::new(&flags, &store)?;
                commands::bootstrap::run(&app, &args).await
            }
            Command::Probe(args) => {
                let app = AppContext::new(&flags, &store)?;
                commands::probe::run(&app, &args).await
            }
        }
    }
}

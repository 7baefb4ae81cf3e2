//! `wsagent config` shows the effective configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file + WSAGENT_* overrides)
    Show,
    /// Print the configuration file path
    Path,
}

/// Run a config subcommand that needs the loaded configuration.
///
/// # Errors
///
/// Returns an error if the configuration cannot be rendered.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show(app),
        ConfigCommand::Path => {
            print_path(&app.config_path, app.is_json());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print the configuration file path without loading the file.
///
/// # Errors
///
/// Returns an error if the path cannot be determined.
pub fn path(store: &impl ConfigStore, json: bool) -> Result<ExitCode> {
    print_path(&store.path()?, json);
    Ok(ExitCode::SUCCESS)
}

fn print_path(path: &std::path::Path, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "path": path.display().to_string() }));
    } else {
        println!("{}", path.display());
    }
}

fn show(app: &AppContext) -> Result<ExitCode> {
    if app.is_json() {
        println!("{}", json::format_value(&app.config)?);
        return Ok(ExitCode::SUCCESS);
    }
    app.output.header(&format!("{}", app.config_path.display()));
    let yaml = serde_yaml::to_string(&app.config).context("cannot serialize config")?;
    print!("{yaml}");
    Ok(ExitCode::SUCCESS)
}

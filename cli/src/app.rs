//! State shared by the commands that need the loaded configuration.

use std::path::PathBuf;

use anyhow::Result;
use wsagent_common::LauncherConfig;

use crate::application::ports::ConfigStore;
use crate::application::services::BootstrapSettings;
use crate::infra::YamlMachineRegistry;
use crate::output::OutputContext;

/// Global presentation flags (`--no-color`, `--quiet`, `--json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
}

/// Everything a config-dependent command handler receives.
pub struct AppContext {
    pub output: OutputContext,
    /// Effective launcher configuration, already validated.
    pub config: LauncherConfig,
    /// Config file location; the file itself may not exist.
    pub config_path: PathBuf,
    json: bool,
}

impl AppContext {
    /// Load and validate the configuration, then set up terminal output.
    ///
    /// # Errors
    ///
    /// Fails when the config file or a `WSAGENT_*` variable is unreadable or
    /// holds an invalid value.
    pub fn new(flags: &OutputFlags, store: &impl ConfigStore) -> Result<Self> {
        let config = store.load()?;
        let config_path = store.path()?;
        tracing::debug!(path = %config_path.display(), "configuration loaded");

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            config,
            config_path,
            json: flags.json,
        })
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Bootstrap settings derived from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn settings(&self) -> Result<BootstrapSettings> {
        Ok(BootstrapSettings::from_config(&self.config)?)
    }

    /// The machine registry named by `machines_file`, or the default one.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the home directory
    /// cannot be determined.
    pub fn machine_registry(&self) -> Result<YamlMachineRegistry> {
        let path = match &self.config.machines_file {
            Some(path) => path.clone(),
            None => YamlMachineRegistry::default_path()?,
        };
        Ok(YamlMachineRegistry::new(path))
    }
}

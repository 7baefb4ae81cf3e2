//! Infrastructure implementation of the `ConfigStore` port.
//!
//! Configuration is layered: built-in defaults, then the YAML file, then
//! `WSAGENT_*` environment variables (e.g. `WSAGENT_PING_DELAY_MS=500`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use wsagent_common::{LauncherConfig, ProbeMethod};

use crate::application::ports::ConfigStore;
use crate::domain::validate_launcher_config;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "WSAGENT_";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore {
    path_override: Option<PathBuf>,
}

impl YamlConfigStore {
    /// `path_override` comes from `--config` / `WSAGENT_CONFIG`.
    #[must_use]
    pub fn new(path_override: Option<PathBuf>) -> Self {
        Self { path_override }
    }
}

/// Environment overrides, one optional field per config key.
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    start_command: Option<String>,
    api_endpoint: Option<String>,
    max_start_time_ms: Option<u64>,
    ping_delay_ms: Option<u64>,
    ping_conn_timeout_ms: Option<u64>,
    probe_method: Option<ProbeMethod>,
    valkey_url: Option<String>,
    machines_file: Option<PathBuf>,
}

impl EnvOverrides {
    fn apply(self, config: &mut LauncherConfig) {
        if let Some(v) = self.start_command {
            config.start_command = v;
        }
        if let Some(v) = self.api_endpoint {
            config.api_endpoint = v;
        }
        if let Some(v) = self.max_start_time_ms {
            config.max_start_time_ms = v;
        }
        if let Some(v) = self.ping_delay_ms {
            config.ping_delay_ms = v;
        }
        if let Some(v) = self.ping_conn_timeout_ms {
            config.ping_conn_timeout_ms = v;
        }
        if let Some(v) = self.probe_method {
            config.probe_method = v;
        }
        if let Some(v) = self.valkey_url {
            config.valkey_url = v;
        }
        if let Some(v) = self.machines_file {
            config.machines_file = Some(v);
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<LauncherConfig> {
        let path = self.path()?;
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            LauncherConfig::default()
        };

        let overrides: EnvOverrides = envy::prefixed(ENV_PREFIX)
            .from_env()
            .context("invalid WSAGENT_* environment variable")?;
        overrides.apply(&mut config);

        validate_launcher_config(&config)?;
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path_override {
            return Ok(path.clone());
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".wsagent").join("config.yaml"))
    }
}

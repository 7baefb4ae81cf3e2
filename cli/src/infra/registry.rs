//! Infrastructure implementation of the `MachineResolver` port.
//!
//! `YamlMachineRegistry` reads workspace → machine assignments written by
//! the provisioning side into a YAML file. The file is re-read on every
//! lookup so a long-running launcher sees new machines without restarting.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use wsagent_common::Machine;

use crate::application::ports::MachineResolver;
use crate::domain::ResolveError;

/// On-disk layout of the machine registry.
#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    workspaces: BTreeMap<String, Machine>,
}

/// Machine registry backed by a YAML file.
pub struct YamlMachineRegistry {
    path: PathBuf,
}

impl YamlMachineRegistry {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default registry location: `~/.wsagent/machines.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".wsagent").join("machines.yaml"))
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl MachineResolver for YamlMachineRegistry {
    async fn resolve(&self, workspace_id: &str) -> Result<Machine, ResolveError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "machine registry does not exist");
                return Err(ResolveError::NotFound(workspace_id.to_string()));
            }
            Err(e) => {
                return Err(ResolveError::Unavailable(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let registry: RegistryFile = serde_yaml::from_str(&content).map_err(|e| {
            ResolveError::Unavailable(format!("cannot parse {}: {e}", self.path.display()))
        })?;
        registry
            .workspaces
            .get(workspace_id)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(workspace_id.to_string()))
    }
}

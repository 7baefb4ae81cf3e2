use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// HTTP method used by the readiness probe. Only safe methods are allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    #[default]
    Options,
    Head,
}

impl ProbeMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
        }
    }
}

/// Launcher configuration, stored in `~/.wsagent/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Command line that starts the workspace agent inside the machine.
    pub start_command: String,

    /// API endpoint of the agent; only its path is used, as the probe path.
    pub api_endpoint: String,

    /// How long to wait for the agent to answer before giving up.
    pub max_start_time_ms: u64,

    /// Delay between two readiness probes.
    pub ping_delay_ms: u64,

    /// Timeout of a single readiness probe.
    pub ping_conn_timeout_ms: u64,

    /// Readiness probe method.
    pub probe_method: ProbeMethod,

    /// Valkey (Redis-compatible) URL that receives the agent's output.
    pub valkey_url: String,

    /// Machine registry file. Defaults to `~/.wsagent/machines.yaml`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machines_file: Option<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            start_command: default_start_command(),
            api_endpoint: default_api_endpoint(),
            max_start_time_ms: 180_000,
            ping_delay_ms: 2_000,
            ping_conn_timeout_ms: 2_000,
            probe_method: ProbeMethod::default(),
            valkey_url: default_valkey_url(),
            machines_file: None,
        }
    }
}

impl LauncherConfig {
    #[must_use]
    pub fn max_start_time(&self) -> Duration {
        Duration::from_millis(self.max_start_time_ms)
    }

    #[must_use]
    pub fn ping_delay(&self) -> Duration {
        Duration::from_millis(self.ping_delay_ms)
    }

    #[must_use]
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_conn_timeout_ms)
    }
}

fn default_start_command() -> String {
    "~/che/ws-agent/bin/catalina.sh run".to_string()
}

fn default_api_endpoint() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_valkey_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

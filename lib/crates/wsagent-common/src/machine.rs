use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Logical port name under which a machine exposes the workspace agent's server.
pub const WS_AGENT_PORT: &str = "4401";

/// A network server exposed by a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    /// Externally reachable URL of the server, e.g. `http://10.0.0.5:32768/api`.
    pub url: String,
    /// `host:port` the server is published on, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Reference name given to the server by the provisioner.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl ServerDescriptor {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            address: None,
            reference: None,
        }
    }
}

/// A running machine, keyed by logical port name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    #[serde(default)]
    pub servers: BTreeMap<String, ServerDescriptor>,
}

impl Machine {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            servers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_server(mut self, port: impl Into<String>, server: ServerDescriptor) -> Self {
        self.servers.insert(port.into(), server);
        self
    }

    /// Server registered under the given logical port name.
    #[must_use]
    pub fn server(&self, port: &str) -> Option<&ServerDescriptor> {
        self.servers.get(port)
    }
}

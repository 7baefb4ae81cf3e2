//! Readiness probe request construction.

use std::time::Duration;

use url::Url;
use wsagent_common::{ProbeMethod, ServerDescriptor};

use crate::domain::error::BootstrapError;

/// A single readiness probe against the workspace agent.
///
/// Built once per bootstrap attempt and reused for every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub url: Url,
    pub method: ProbeMethod,
    pub timeout: Duration,
}

impl ProbeRequest {
    /// Target the server's base URL with its path replaced by `ping_path`.
    ///
    /// Query and fragment of the server URL are kept as-is.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::BadServerUrl`] when the server URL cannot be
    /// parsed or cannot carry a path.
    pub fn for_server(
        server: &ServerDescriptor,
        ping_path: &str,
        method: ProbeMethod,
        timeout: Duration,
    ) -> Result<Self, BootstrapError> {
        let bad = |reason: String| BootstrapError::BadServerUrl {
            url: server.url.clone(),
            reason,
        };
        let mut url = Url::parse(&server.url).map_err(|e| bad(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(bad("not a hierarchical URL".to_string()));
        }
        url.set_path(ping_path);
        Ok(Self {
            url,
            method,
            timeout,
        })
    }
}

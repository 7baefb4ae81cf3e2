//! Validation of launcher configuration.
//!
//! Pure functions only; no I/O.

use url::Url;
use wsagent_common::LauncherConfig;

use crate::domain::error::ConfigError;

/// Validates a loaded configuration before any collaborator is built.
///
/// # Errors
///
/// Returns the first invalid field found.
pub fn validate_launcher_config(config: &LauncherConfig) -> Result<(), ConfigError> {
    if config.start_command.trim().is_empty() {
        return Err(invalid(
            "start_command",
            &config.start_command,
            "The agent start command must not be empty.",
        ));
    }
    for (key, value) in [
        ("max_start_time_ms", config.max_start_time_ms),
        ("ping_delay_ms", config.ping_delay_ms),
        ("ping_conn_timeout_ms", config.ping_conn_timeout_ms),
    ] {
        if value == 0 {
            return Err(invalid(key, "0", "Durations are milliseconds and must be > 0."));
        }
    }
    ping_path(&config.api_endpoint)?;
    if !config.valkey_url.starts_with("redis://") && !config.valkey_url.starts_with("rediss://") {
        return Err(invalid(
            "valkey_url",
            &config.valkey_url,
            "Expected a redis:// or rediss:// URL.",
        ));
    }
    Ok(())
}

/// Path component of the API endpoint, always ending with `/`.
///
/// The agent answers 404 on the API root without the trailing slash.
///
/// # Errors
///
/// Returns an error if `api_endpoint` is not an absolute URL.
pub fn ping_path(api_endpoint: &str) -> Result<String, ConfigError> {
    let url = Url::parse(api_endpoint).map_err(|e| {
        invalid(
            "api_endpoint",
            api_endpoint,
            &format!("Expected an absolute URL ({e})."),
        )
    })?;
    let path = url.path();
    Ok(if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    })
}

fn invalid(key: &str, value: &str, hint: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
}

//! Command implementations

pub mod bootstrap;
pub mod channel;
pub mod config;
pub mod probe;
pub mod version;

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::domain::BootstrapError;
use crate::output::json;

/// Exit status for an attempt abandoned on `Ctrl-C`.
pub const EXIT_CANCELLED: u8 = 130;

/// Render a bootstrap failure and pick the exit code for it.
///
/// # Errors
///
/// Returns an error if the JSON error object cannot be serialized.
pub fn report_failure(app: &AppContext, err: &BootstrapError) -> Result<ExitCode> {
    if app.is_json() {
        println!("{}", json::format_error(&err.to_string(), err.code())?);
    } else {
        app.output.error(&err.to_string());
        if err.requires_stop() {
            app.output
                .warn("the workspace should be stopped by its owner");
        }
    }
    Ok(match err {
        BootstrapError::Cancelled => ExitCode::from(EXIT_CANCELLED),
        _ => ExitCode::FAILURE,
    })
}

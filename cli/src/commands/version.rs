//! Version command

use std::process::ExitCode;

/// Run the version command.
pub fn run(json: bool) -> ExitCode {
    let version = env!("CARGO_PKG_VERSION");

    if json {
        println!(r#"{{"version":"{version}"}}"#);
    } else {
        println!("wsagent {version}");
    }
    ExitCode::SUCCESS
}

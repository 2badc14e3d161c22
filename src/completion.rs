//! Shell completion scripts through `clap_complete`.
//!
//! A program built on [`crate::ArgumentParser`] prints its completion
//! script when the settings' `complete_env` variable names a shell:
//!
//! ```text
//! COMPLETE=bash my-tool >> ~/.bash_completion
//! ```

use std::io::Write;
use std::str::FromStr;

use clap::Command;
use clap_complete::Shell;

/// The shell requested through `env_var`, if any.
///
/// An unset or empty variable is no request. An unknown shell name is
/// logged and ignored so the program still runs normally.
pub fn completion_request(env_var: &str) -> Option<Shell> {
    let value = std::env::var(env_var).ok()?;
    shell_from_name(&value)
}

fn shell_from_name(value: &str) -> Option<Shell> {
    let name = value.trim();
    if name.is_empty() {
        return None;
    }
    match Shell::from_str(&name.to_ascii_lowercase()) {
        Ok(shell) => Some(shell),
        Err(_) => {
            tracing::warn!(shell = %name, "Ignoring completion request for unknown shell");
            None
        }
    }
}

/// Write the completion script for `cmd` to `out`.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    tracing::debug!(shell = %shell, bin = %bin_name, "Generating completion script");
    clap_complete::generate(shell, cmd, bin_name, out);
}

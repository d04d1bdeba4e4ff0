//! Thin wrappers around external commands.
//!
//! Every backend talks to the desktop through a CLI tool; these helpers
//! capture stderr so failures carry the tool's own message.

use anyhow::{Context, Result};
use std::process::Command;

use crate::ui;

/// Output of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Run `program` with `args`, capturing output
pub fn run(program: &str, args: &[&str]) -> Result<CommandOutput> {
    ui::debug("command.run", &format!("{} {}", program, args.join(" ")));

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {program}"))?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        success: output.status.success(),
    })
}

/// Run a command and fail with its stderr on non-zero exit
pub fn run_checked(program: &str, args: &[&str]) -> Result<String> {
    let out = run(program, args)?;
    if !out.success {
        anyhow::bail!("{} failed: {}", program, out.stderr);
    }
    Ok(out.stdout)
}

/// Whether `program` is on PATH
pub fn has_tool(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Check if a process with the given name is running
pub fn is_process_running(process_name: &str) -> bool {
    if let Ok(output) = Command::new("pgrep").arg("-x").arg(process_name).output()
        && !output.stdout.is_empty()
    {
        return true;
    }
    false
}

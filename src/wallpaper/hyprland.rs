use anyhow::{Context, Result};
use std::process::Command;
use std::time::{Duration, Instant};

use super::{OutputImage, require_tool};
use crate::common::command;

/// Apply per-output wallpapers on Hyprland using swww
pub fn apply_wallpaper(outputs: &[OutputImage]) -> Result<()> {
    if require_tool("swww").is_err() {
        anyhow::bail!(
            "swww is not installed. \
             swww is required for wallpaper support on Hyprland."
        );
    }

    ensure_daemon()?;

    for output in outputs {
        let path = output.path.display().to_string();
        command::run_checked(
            "swww",
            &["img", "-o", &output.monitor.name, "--transition-type", "none", &path],
        )
        .with_context(|| format!("setting background of {}", output.monitor.name))?;
    }
    Ok(())
}

/// Start swww-daemon if `swww query` cannot reach it
fn ensure_daemon() -> Result<()> {
    if command::run("swww", &["query"])?.success {
        return Ok(());
    }

    Command::new("swww-daemon")
        .spawn()
        .context("Failed to start swww-daemon")?;

    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if command::run("swww", &["query"])?.success {
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    anyhow::bail!("swww-daemon did not become ready")
}

//! X11 monitor query via `xrandr --query`.

use anyhow::Result;
use regex::Regex;

use super::RawMonitor;
use crate::common::command;

pub fn get_monitors() -> Result<Vec<RawMonitor>> {
    let stdout = command::run_checked("xrandr", &["--query"])?;
    parse_query(&stdout)
}

/// Extract connected outputs that currently have a mode.
///
/// Example line: `HDMI-1 connected primary 1920x1080+0+0 (normal left ...) 527mm x 296mm`
fn parse_query(stdout: &str) -> Result<Vec<RawMonitor>> {
    let re = Regex::new(r"^(\S+) connected (primary )?(\d+)x(\d+)([+-]\d+)([+-]\d+)")?;

    let mut monitors = Vec::new();
    for line in stdout.lines() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let mut monitor = RawMonitor::new(
            &caps[1],
            caps[5].parse()?,
            caps[6].parse()?,
            caps[3].parse()?,
            caps[4].parse()?,
        );
        monitor.primary = caps.get(2).is_some();
        monitors.push(monitor);
    }
    Ok(monitors)
}

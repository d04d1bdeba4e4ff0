//! Sway output query via `swaymsg -t get_outputs`.

use anyhow::{Context, Result};

use super::{LayoutOutput, RawMonitor, to_device_pixels};
use crate::common::command;

pub fn get_outputs() -> Result<Vec<RawMonitor>> {
    let stdout = command::run_checked("swaymsg", &["-t", "get_outputs", "--raw"])?;
    parse_outputs(&stdout)
}

/// Parse swaymsg JSON, keeping only active outputs.
///
/// `rect` is in layout coordinates and already accounts for rotation, so
/// only the scale is needed to recover pixel sizes.
fn parse_outputs(json_str: &str) -> Result<Vec<RawMonitor>> {
    let outputs: Vec<serde_json::Value> =
        serde_json::from_str(json_str).context("Failed to parse swaymsg output JSON")?;

    let mut monitors = Vec::new();
    for out in outputs {
        if !out.get("active").and_then(|v| v.as_bool()).unwrap_or(false) {
            continue;
        }
        let name = out
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing output name"))?;
        let rect = out
            .get("rect")
            .ok_or_else(|| anyhow::anyhow!("Missing rect for {}", name))?;

        let field = |key: &str| {
            rect.get(key)
                .and_then(|v| v.as_i64())
                .ok_or_else(|| anyhow::anyhow!("Missing rect.{} for {}", key, name))
        };

        monitors.push(LayoutOutput {
            name: name.to_string(),
            x: i32::try_from(field("x")?)?,
            y: i32::try_from(field("y")?)?,
            width: f64::from(u32::try_from(field("width")?)?),
            height: f64::from(u32::try_from(field("height")?)?),
            scale: out.get("scale").and_then(|v| v.as_f64()).unwrap_or(1.0),
            primary: out
                .get("focused")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        });
    }
    to_device_pixels(monitors)
}

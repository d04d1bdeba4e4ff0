//! Hyprland monitor query via `hyprctl monitors -j`.
//!
//! hyprctl reports `width`/`height` in physical pixels of the unrotated mode
//! but `x`/`y` in layout units, so sizes are brought into layout space first.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{LayoutOutput, RawMonitor, to_device_pixels};
use crate::common::command;

#[derive(Debug, Deserialize)]
struct HyprMonitor {
    name: String,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    #[serde(default = "default_scale")]
    scale: f64,
    /// wl_output transform; odd values rotate by 90 or 270 degrees
    #[serde(default)]
    transform: u8,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    focused: bool,
}

fn default_scale() -> f64 {
    1.0
}

impl HyprMonitor {
    fn layout(self) -> LayoutOutput {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        };
        let (w, h) = if self.transform % 2 == 1 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        LayoutOutput {
            name: self.name,
            x: self.x,
            y: self.y,
            width: (f64::from(w) / scale).round(),
            height: (f64::from(h) / scale).round(),
            scale,
            primary: self.focused,
        }
    }
}

pub fn get_monitors() -> Result<Vec<RawMonitor>> {
    let stdout = command::run_checked("hyprctl", &["monitors", "-j"])?;
    parse_monitors(&stdout)
}

fn parse_monitors(json_str: &str) -> Result<Vec<RawMonitor>> {
    let monitors: Vec<HyprMonitor> =
        serde_json::from_str(json_str).context("Failed to parse hyprctl monitors JSON")?;

    to_device_pixels(
        monitors
            .into_iter()
            .filter(|m| !m.disabled)
            .map(HyprMonitor::layout)
            .collect(),
    )
}

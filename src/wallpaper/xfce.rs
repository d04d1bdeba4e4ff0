use anyhow::{Context, Result};
use std::path::Path;

use super::require_tool;
use crate::common::command;

const CHANNEL: &str = "xfce4-desktop";
/// xfdesktop image-style "spanning screens"
const STYLE_SPANNING: &str = "6";

pub fn apply_wallpaper(path: &Path) -> Result<()> {
    require_tool("xfconf-query")?;

    let listing = command::run_checked("xfconf-query", &["-c", CHANNEL, "-l"])?;
    let properties = backdrop_properties(&listing);
    if properties.is_empty() {
        anyhow::bail!("no xfce4-desktop backdrop properties found (is xfdesktop running?)");
    }

    let file = path.display().to_string();
    for image_prop in properties {
        command::run_checked("xfconf-query", &["-c", CHANNEL, "-p", image_prop, "-s", &file])
            .with_context(|| format!("setting {image_prop}"))?;

        let style_prop = style_property(image_prop);
        command::run_checked(
            "xfconf-query",
            &[
                "-c",
                CHANNEL,
                "-p",
                &style_prop,
                "-n",
                "-t",
                "int",
                "-s",
                STYLE_SPANNING,
            ],
        )
        .with_context(|| format!("setting {style_prop}"))?;
    }
    Ok(())
}

/// Every `.../last-image` property, one per monitor and workspace
fn backdrop_properties(listing: &str) -> Vec<&str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("/backdrop/") && line.ends_with("/last-image"))
        .collect()
}

fn style_property(image_prop: &str) -> String {
    format!(
        "{}/image-style",
        image_prop.trim_end_matches("/last-image")
    )
}

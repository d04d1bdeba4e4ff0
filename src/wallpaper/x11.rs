use anyhow::Result;
use std::path::Path;

use crate::common::command;

/// Paint the root window with the spanned canvas.
///
/// The canvas is exactly the size of the root window, so centering without
/// Xinerama places every monitor's region on that monitor.
pub fn apply_wallpaper(path: &Path) -> Result<()> {
    let file = path.display().to_string();

    if command::has_tool("feh") {
        command::run_checked("feh", &["--no-xinerama", "--no-fehbg", "--bg-center", &file])?;
        return Ok(());
    }
    if command::has_tool("xwallpaper") {
        command::run_checked("xwallpaper", &["--no-randr", "--center", &file])?;
        return Ok(());
    }

    anyhow::bail!("neither feh nor xwallpaper is installed")
}

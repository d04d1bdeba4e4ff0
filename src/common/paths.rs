use anyhow::{Context, Result};
use std::path::PathBuf;

/// Centralized path management for bk

/// Get the bk config directory
pub fn bk_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("bk"))
}

/// Path of the config file, honoring `BK_CONFIG`
pub fn config_file_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os("BK_CONFIG") {
        return Ok(PathBuf::from(p));
    }
    Ok(bk_config_dir()?.join("bk.toml"))
}

/// Default directory for composed wallpapers
pub fn default_wallpaper_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().context("Could not find local data directory")?;
    Ok(data_dir.join("bk").join("wallpaper"))
}

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).with_context(|| format!("expanding path {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Make a path absolute relative to the current directory
pub fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir()
        .context("getting current directory")?
        .join(path))
}

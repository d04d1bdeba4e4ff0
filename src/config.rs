use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::paths;
use crate::compose::FitMode;
use crate::wallpaper::Backend;

/// Contents of `bk.toml`. Every field is optional; CLI flags win.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BkConfig {
    /// Default fit mode
    pub mode: Option<FitMode>,
    /// Background color as #rrggbb
    pub color: Option<String>,
    /// Force a background setter
    pub backend: Option<Backend>,
    /// Where composed wallpapers are written
    pub wallpaper_dir: Option<String>,
}

impl BkConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file_path()?)
    }

    pub fn load_from(cfg_path: &Path) -> Result<Self> {
        if !cfg_path.exists() {
            return Ok(Self::default());
        }

        let s = fs::read_to_string(cfg_path)
            .with_context(|| format!("reading config {}", cfg_path.display()))?;
        toml::from_str(&s).with_context(|| format!("parsing config {}", cfg_path.display()))
    }

    /// Resolved wallpaper directory, tilde-expanded and absolute
    pub fn wallpaper_dir(&self) -> Result<PathBuf> {
        match &self.wallpaper_dir {
            Some(raw) => paths::absolutize(paths::expand_path(raw)?),
            None => paths::default_wallpaper_dir(),
        }
    }
}

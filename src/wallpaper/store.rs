use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use crate::common::fs::atomic_write;

const PREFIX: &str = "bk-";
const SUFFIX: &str = ".png";

/// Directory of composed wallpapers.
///
/// Files are named after a hash of their content so desktops that cache by
/// URI notice a change.
#[derive(Debug, Clone)]
pub struct WallpaperStore {
    dir: PathBuf,
}

impl WallpaperStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Atomically write PNG bytes, returning the absolute file path
    pub fn write(&self, png: &[u8]) -> Result<PathBuf> {
        let digest = Sha256::digest(png);
        let hash: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();
        let path = self.dir.join(format!("{PREFIX}{hash}{SUFFIX}"));
        atomic_write(&path, png)?;
        Ok(path)
    }

    /// Remove earlier wallpapers, keeping `keep`
    pub fn prune(&self, keep: &[PathBuf]) -> Result<()> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("reading {}", self.dir.display()))?;
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(PREFIX) && name.ends_with(SUFFIX) && !keep.contains(&path) {
                fs::remove_file(&path)
                    .with_context(|| format!("removing {}", path.display()))?;
            }
        }
        Ok(())
    }
}

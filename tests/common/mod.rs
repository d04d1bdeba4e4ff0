use anyhow::Result;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding test images, config and outputs
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Config file handed to bk through `BK_CONFIG`; absent unless written
    pub fn config_path(&self) -> PathBuf {
        self.path().join("bk.toml")
    }

    pub fn write_config(&self, contents: &str) -> Result<()> {
        std::fs::write(self.config_path(), contents)?;
        Ok(())
    }

    /// Write a solid-color PNG and return its path
    pub fn solid_image(&self, name: &str, width: u32, height: u32, color: [u8; 4]) -> Result<PathBuf> {
        let path = self.path().join(name);
        RgbaImage::from_pixel(width, height, Rgba(color)).save(&path)?;
        Ok(path)
    }
}

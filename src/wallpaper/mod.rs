//! Platform background setters.
//!
//! The composed canvas is written to the wallpaper directory and handed to
//! the desktop. Spanning backends take the whole canvas as one image;
//! per-output backends get one crop per monitor.

mod gnome;
mod hyprland;
mod kwin;
mod store;
mod sway;
#[cfg(windows)]
mod windows;
mod x11;
mod xfce;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::common::compositor::CompositorType;
use crate::common::display_server::DisplayServer;
use crate::compose::{CompositeCanvas, encode};
use crate::error::BkError;
use crate::monitor::Monitor;
use crate::ui;

pub use store::WallpaperStore;

/// Desktop mechanism used to set the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Gnome,
    Cinnamon,
    Mate,
    Xfce,
    Kde,
    Sway,
    Hyprland,
    X11,
    Windows,
}

/// How a backend consumes the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One image stretched over the whole virtual desktop
    Spanned,
    /// One image per monitor
    PerOutput,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Gnome => "gnome",
            Backend::Cinnamon => "cinnamon",
            Backend::Mate => "mate",
            Backend::Xfce => "xfce",
            Backend::Kde => "kde",
            Backend::Sway => "sway",
            Backend::Hyprland => "hyprland",
            Backend::X11 => "x11",
            Backend::Windows => "windows",
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Backend::Kde | Backend::Sway | Backend::Hyprland => Layout::PerOutput,
            _ => Layout::Spanned,
        }
    }

    /// Detect the backend for the running session
    pub fn detect() -> Option<Self> {
        if cfg!(windows) {
            return Some(Backend::Windows);
        }

        let hints = [
            env::var("XDG_CURRENT_DESKTOP").ok(),
            env::var("XDG_SESSION_DESKTOP").ok(),
            env::var("DESKTOP_SESSION").ok(),
        ];
        if let Some(found) = Self::from_desktop_hints(&hints) {
            return Some(found);
        }

        match CompositorType::detect() {
            CompositorType::Sway => return Some(Backend::Sway),
            CompositorType::Hyprland => return Some(Backend::Hyprland),
            CompositorType::Other => {}
        }

        match DisplayServer::detect() {
            DisplayServer::X11 => Some(Backend::X11),
            _ => None,
        }
    }

    /// First recognized name across the desktop environment variables.
    ///
    /// `XDG_CURRENT_DESKTOP` may hold a colon-separated list such as
    /// `ubuntu:GNOME`.
    fn from_desktop_hints(hints: &[Option<String>]) -> Option<Self> {
        hints
            .iter()
            .flatten()
            .flat_map(|value| value.split(':'))
            .find_map(Self::from_desktop_name)
    }

    fn from_desktop_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "gnome" | "gnome-classic" | "ubuntu" | "unity" | "budgie" | "budgie-desktop"
            | "pantheon" => Some(Backend::Gnome),
            "x-cinnamon" | "cinnamon" => Some(Backend::Cinnamon),
            "mate" => Some(Backend::Mate),
            "xfce" | "xfce4" | "xubuntu" => Some(Backend::Xfce),
            "kde" | "plasma" | "plasmawayland" => Some(Backend::Kde),
            "sway" => Some(Backend::Sway),
            "hyprland" => Some(Backend::Hyprland),
            _ => None,
        }
    }

    fn apply_spanned(&self, path: &Path) -> Result<()> {
        match self {
            Backend::Gnome => gnome::apply_wallpaper(gnome::Schema::Gnome, path),
            Backend::Cinnamon => gnome::apply_wallpaper(gnome::Schema::Cinnamon, path),
            Backend::Mate => gnome::apply_wallpaper(gnome::Schema::Mate, path),
            Backend::Xfce => xfce::apply_wallpaper(path),
            Backend::X11 => x11::apply_wallpaper(path),
            Backend::Windows => apply_windows(path),
            Backend::Kde | Backend::Sway | Backend::Hyprland => {
                anyhow::bail!("{} sets one image per output", self.name())
            }
        }
    }

    fn apply_per_output(&self, outputs: &[OutputImage], origin: (i64, i64)) -> Result<()> {
        match self {
            Backend::Kde => kwin::apply_wallpaper(outputs, origin),
            Backend::Sway => sway::apply_wallpaper(outputs),
            Backend::Hyprland => hyprland::apply_wallpaper(outputs),
            _ => anyhow::bail!("{} spans a single image", self.name()),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(windows)]
fn apply_windows(path: &Path) -> Result<()> {
    windows::apply_wallpaper(path)
}

#[cfg(not(windows))]
fn apply_windows(_path: &Path) -> Result<()> {
    anyhow::bail!("the windows backend is only available on Windows")
}

/// A monitor and the file holding its part of the canvas
#[derive(Debug, Clone)]
pub struct OutputImage {
    pub monitor: Monitor,
    pub path: PathBuf,
}

/// Persist the canvas and set it as the desktop background.
///
/// Any failure, including writing the image, is reported as
/// [`BkError::PlatformApply`].
pub fn apply(canvas: &CompositeCanvas, backend: Backend, store: &WallpaperStore) -> Result<(), BkError> {
    ui::debug(
        "wallpaper.backend",
        &format!("Applying via {} ({:?})", backend, backend.layout()),
    );
    apply_inner(canvas, backend, store).map_err(|err| BkError::apply(backend.name(), format!("{err:#}")))
}

fn apply_inner(canvas: &CompositeCanvas, backend: Backend, store: &WallpaperStore) -> Result<()> {
    let written = match backend.layout() {
        Layout::Spanned => {
            let path = store.write(&canvas.encode_png()?)?;
            backend.apply_spanned(&path)?;
            vec![path]
        }
        Layout::PerOutput => {
            let mut outputs = Vec::with_capacity(canvas.monitors().len());
            for monitor in canvas.monitors().iter() {
                let bytes = encode(&canvas.region(monitor), image::ImageFormat::Png)?;
                outputs.push(OutputImage {
                    monitor: monitor.clone(),
                    path: store.write(&bytes)?,
                });
            }
            backend.apply_per_output(&outputs, canvas.monitors().origin())?;
            outputs.into_iter().map(|o| o.path).collect()
        }
    };

    if let Err(err) = store.prune(&written) {
        ui::emit(
            ui::Level::Warn,
            "wallpaper.prune_failed",
            &format!("Could not remove old wallpapers: {err:#}"),
            None,
        );
    }
    Ok(())
}

/// Require `tool` on PATH, naming it in the error otherwise
pub(crate) fn require_tool(tool: &str) -> Result<()> {
    if !crate::common::command::has_tool(tool) {
        anyhow::bail!("{tool} is not installed or not on PATH");
    }
    Ok(())
}

/// `file://` URI for a local path
pub(crate) fn file_uri(path: &Path) -> Result<String> {
    let s = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("path is not valid UTF-8: {}", path.display()))?;
    Ok(format!("file://{s}"))
}

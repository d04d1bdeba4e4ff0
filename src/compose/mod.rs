//! Image composition.
//!
//! Turns a [`BackgroundAssignment`] and a [`MonitorSet`] into one canvas
//! spanning the whole virtual desktop. Apart from decoding the source images
//! this is a pure transform.

pub mod color;
mod fit;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage, imageops};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::common::fs::atomic_write;
use crate::error::BkError;
use crate::monitor::{Monitor, MonitorRef, MonitorSet};
use crate::ui;

/// How an image is placed inside a monitor region
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Resize to the region, ignoring aspect ratio
    Stretch,
    /// Native size, centered, padded or clipped
    Center,
    /// Scale to cover the region, then center-crop
    #[default]
    Fill,
    /// Repeat at native size from the top-left corner
    Tile,
}

impl FitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Stretch => "stretch",
            FitMode::Center => "center",
            FitMode::Fill => "fill",
            FitMode::Tile => "tile",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stretch" => Ok(FitMode::Stretch),
            "center" => Ok(FitMode::Center),
            "fill" => Ok(FitMode::Fill),
            "tile" => Ok(FitMode::Tile),
            other => anyhow::bail!("unknown mode '{other}' (expected stretch, center, fill or tile)"),
        }
    }
}

/// One image and the way it should fill its region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    pub path: PathBuf,
    pub mode: FitMode,
}

impl ImageSpec {
    pub fn new(path: impl Into<PathBuf>, mode: FitMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }
}

/// Which image goes on which monitor.
///
/// Monitors without an explicit binding get the global image, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundAssignment {
    global: Option<ImageSpec>,
    bindings: Vec<(MonitorRef, ImageSpec)>,
    background: Rgba<u8>,
}

impl Default for BackgroundAssignment {
    fn default() -> Self {
        Self {
            global: None,
            bindings: Vec::new(),
            background: Rgba([0, 0, 0, 255]),
        }
    }
}

impl BackgroundAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// One image on every monitor
    pub fn broadcast(spec: ImageSpec) -> Self {
        let mut assignment = Self::new();
        assignment.set_global(spec);
        assignment
    }

    /// Assignment from positional images: a single image is broadcast,
    /// several are bound to monitors by index.
    pub fn from_images(paths: Vec<PathBuf>, mode: FitMode) -> Self {
        if let [path] = paths.as_slice() {
            return Self::broadcast(ImageSpec::new(path.clone(), mode));
        }
        let mut assignment = Self::new();
        for (idx, path) in paths.into_iter().enumerate() {
            assignment.bind(MonitorRef::Index(idx), ImageSpec::new(path, mode));
        }
        assignment
    }

    pub fn set_global(&mut self, spec: ImageSpec) {
        self.global = Some(spec);
    }

    /// Bind an image to a monitor; later bindings win over earlier ones
    pub fn bind(&mut self, monitor: MonitorRef, spec: ImageSpec) {
        self.bindings.push((monitor, spec));
    }

    pub fn with_background(mut self, color: Rgba<u8>) -> Self {
        self.background = color;
        self
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    /// Image spec for every monitor in set order.
    ///
    /// Fails if any binding names a monitor outside the set.
    fn resolve<'a>(&'a self, monitors: &MonitorSet) -> Result<Vec<Option<&'a ImageSpec>>, BkError> {
        let mut per_monitor: Vec<Option<&ImageSpec>> = vec![self.global.as_ref(); monitors.len()];

        for (reference, spec) in &self.bindings {
            let monitor = monitors
                .resolve(reference)
                .ok_or_else(|| BkError::AssignmentMismatch {
                    monitor: reference.to_string(),
                    available: monitors.describe_ids(),
                })?;
            per_monitor[monitor.id] = Some(spec);
        }

        Ok(per_monitor)
    }
}

/// A decoded source image
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub pixels: RgbaImage,
}

impl SourceImage {
    pub fn open(path: &Path) -> Result<Self, BkError> {
        let unsupported = |reason: String| BkError::UnsupportedImageFormat {
            path: path.to_path_buf(),
            reason,
        };

        let img = ImageReader::open(path)
            .map_err(|e| unsupported(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| unsupported(e.to_string()))?
            .decode()
            .map_err(|e| unsupported(e.to_string()))?;

        if img.width() == 0 || img.height() == 0 {
            return Err(unsupported("image has no pixels".into()));
        }

        Ok(Self {
            pixels: img.to_rgba8(),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// The composed virtual-desktop image plus the layout it was built for
#[derive(Debug, Clone)]
pub struct CompositeCanvas {
    image: RgbaImage,
    monitors: MonitorSet,
}

impl CompositeCanvas {
    #[cfg(test)]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn monitors(&self) -> &MonitorSet {
        &self.monitors
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// The part of the canvas shown on one monitor
    pub fn region(&self, monitor: &Monitor) -> RgbaImage {
        imageops::crop_imm(
            &self.image,
            monitor.x,
            monitor.y,
            monitor.width,
            monitor.height,
        )
        .to_image()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        encode(&self.image, ImageFormat::Png)
    }

    /// Atomically write the canvas; the format follows the file extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
        let bytes = encode(&self.image, format)?;
        atomic_write(path, &bytes)
    }
}

/// Encode an opaque RGBA image. The alpha channel is dropped since some
/// encoders (JPEG) reject it and the canvas is always opaque.
pub fn encode(image: &RgbaImage, format: ImageFormat) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}

/// Compose the assigned images onto a canvas covering every monitor.
///
/// Bindings are validated before anything is decoded, so a mismatch never
/// yields a partial canvas. Each distinct path is decoded once.
pub fn compose(
    monitors: &MonitorSet,
    assignment: &BackgroundAssignment,
) -> Result<CompositeCanvas, BkError> {
    let per_monitor = assignment.resolve(monitors)?;

    let mut sources: HashMap<PathBuf, SourceImage> = HashMap::new();
    for spec in per_monitor.iter().flatten() {
        if let Entry::Vacant(slot) = sources.entry(spec.path.clone()) {
            let source = SourceImage::open(&spec.path)?;
            let (w, h) = source.dimensions();
            ui::debug(
                "compose.decoded",
                &format!("Decoded {} ({}x{})", spec.path.display(), w, h),
            );
            slot.insert(source);
        }
    }

    let background = assignment.background();
    let (width, height) = monitors.virtual_size();
    let mut canvas = RgbaImage::from_pixel(width, height, background);

    for (monitor, spec) in monitors.iter().zip(per_monitor) {
        let region = match spec.and_then(|s| sources.get(&s.path).map(|src| (s, src))) {
            Some((spec, source)) => {
                ui::debug(
                    "compose.place",
                    &format!(
                        "{} -> monitor {} ({})",
                        spec.path.display(),
                        monitor.id,
                        spec.mode
                    ),
                );
                fit::render(
                    &source.pixels,
                    monitor.width,
                    monitor.height,
                    spec.mode,
                    background,
                )
            }
            None => RgbaImage::from_pixel(monitor.width, monitor.height, background),
        };
        imageops::replace(&mut canvas, &region, i64::from(monitor.x), i64::from(monitor.y));
    }

    Ok(CompositeCanvas {
        image: canvas,
        monitors: monitors.clone(),
    })
}

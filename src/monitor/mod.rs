//! Display enumeration.
//!
//! Monitors are queried from whatever the session exposes (swaymsg, hyprctl,
//! xrandr or Win32) and normalized into a [`MonitorSet`] whose bounding box
//! starts at the origin.

mod hyprland;
mod sway;
#[cfg(windows)]
mod windows;
mod xrandr;

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::common::compositor::CompositorType;
use crate::common::display_server::DisplayServer;
use crate::error::BkError;
use crate::ui;

/// Monitor geometry as reported by the OS, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMonitor {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub primary: bool,
}

impl RawMonitor {
    pub fn new(name: impl Into<String>, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
            primary: false,
        }
    }
}

/// An output in compositor layout coordinates.
///
/// Sway and Hyprland position outputs in logical units, so a HiDPI output
/// occupies fewer layout units than it has pixels.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LayoutOutput {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub primary: bool,
}

/// Convert layout coordinates to pixels of the densest output.
///
/// Every coordinate is multiplied by the largest scale factor, so HiDPI
/// outputs get full-resolution regions and neighbours never overlap. Edges
/// are rounded individually to keep adjacent outputs flush.
pub(crate) fn to_device_pixels(outputs: Vec<LayoutOutput>) -> Result<Vec<RawMonitor>> {
    let factor = outputs
        .iter()
        .map(|o| o.scale)
        .filter(|s| s.is_finite() && *s > 0.0)
        .fold(1.0_f64, f64::max);

    outputs
        .into_iter()
        .map(|o| {
            let edge = |v: f64| -> Result<i64> {
                let px = (v * factor).round();
                if !px.is_finite() || px.abs() > f64::from(i32::MAX) {
                    anyhow::bail!("output {} is outside the supported coordinate range", o.name);
                }
                Ok(px as i64)
            };
            let left = edge(f64::from(o.x))?;
            let top = edge(f64::from(o.y))?;
            let right = edge(f64::from(o.x) + o.width)?;
            let bottom = edge(f64::from(o.y) + o.height)?;

            let mut raw = RawMonitor::new(
                o.name.clone(),
                i32::try_from(left)?,
                i32::try_from(top)?,
                u32::try_from(right - left)?,
                u32::try_from(bottom - top)?,
            );
            raw.primary = o.primary;
            Ok(raw)
        })
        .collect()
}

/// Name prefix for monitors given by geometry alone
const UNNAMED_PREFIX: &str = "geometry-";

/// Upper bound on the composed canvas, in bytes of RGBA
pub const MAX_CANVAS_BYTES: u64 = 1 << 30;

/// A monitor placed in virtual-desktop space
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Monitor {
    /// Position in the ordered set
    pub id: usize,
    /// Output name (e.g. "eDP-1", "HDMI-A-1")
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub primary: bool,
}

impl Monitor {
    pub fn label(&self) -> String {
        format!(
            "{} ({}): {}x{}+{}+{}{}",
            self.id,
            self.name,
            self.width,
            self.height,
            self.x,
            self.y,
            if self.primary { " primary" } else { "" }
        )
    }

    /// False for `--geometry` monitors that were not given an output name
    pub fn has_output_name(&self) -> bool {
        !self.name.starts_with(UNNAMED_PREFIX)
    }
}

/// How a user refers to a monitor: by index or by output name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MonitorRef {
    Index(usize),
    Name(String),
}

impl FromStr for MonitorRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            anyhow::bail!("empty monitor reference");
        }
        Ok(match s.parse::<usize>() {
            Ok(idx) => MonitorRef::Index(idx),
            Err(_) => MonitorRef::Name(s.to_string()),
        })
    }
}

impl fmt::Display for MonitorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorRef::Index(idx) => write!(f, "{idx}"),
            MonitorRef::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Ordered, non-empty set of monitors covering the virtual desktop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSet {
    monitors: Vec<Monitor>,
    width: u32,
    height: u32,
    origin: (i64, i64),
}

impl MonitorSet {
    /// Normalize raw geometries: order left-to-right, then top-to-bottom,
    /// and shift so the bounding box starts at (0, 0).
    pub fn new(mut raw: Vec<RawMonitor>) -> Result<Self, BkError> {
        if raw.is_empty() {
            return Err(BkError::PlatformQuery("no active monitors reported".into()));
        }
        if let Some(bad) = raw.iter().find(|m| m.width == 0 || m.height == 0) {
            return Err(BkError::PlatformQuery(format!(
                "monitor {} reported an empty size",
                bad.name
            )));
        }

        raw.sort_by(|a, b| (a.x, a.y, &a.name).cmp(&(b.x, b.y, &b.name)));

        let min_x = raw.iter().map(|m| i64::from(m.x)).min().unwrap_or(0);
        let min_y = raw.iter().map(|m| i64::from(m.y)).min().unwrap_or(0);

        let mut width = 0u32;
        let mut height = 0u32;
        let mut monitors = Vec::with_capacity(raw.len());
        for (id, m) in raw.into_iter().enumerate() {
            let x = to_u32(i64::from(m.x) - min_x)?;
            let y = to_u32(i64::from(m.y) - min_y)?;
            let right = x.checked_add(m.width).ok_or_else(|| too_large(&m.name))?;
            let bottom = y.checked_add(m.height).ok_or_else(|| too_large(&m.name))?;
            width = width.max(right);
            height = height.max(bottom);
            monitors.push(Monitor {
                id,
                name: m.name,
                x,
                y,
                width: m.width,
                height: m.height,
                primary: m.primary,
            });
        }

        let bytes = u64::from(width)
            .saturating_mul(u64::from(height))
            .saturating_mul(4);
        if bytes > MAX_CANVAS_BYTES {
            return Err(BkError::PlatformQuery(format!(
                "virtual desktop {width}x{height} is too large to compose (limit {} MiB)",
                MAX_CANVAS_BYTES >> 20
            )));
        }

        Ok(Self {
            monitors,
            width,
            height,
            origin: (min_x, min_y),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.iter()
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Size of the virtual desktop bounding box
    pub fn virtual_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// OS coordinates of the bounding box's top-left corner
    pub fn origin(&self) -> (i64, i64) {
        self.origin
    }

    pub fn resolve(&self, reference: &MonitorRef) -> Option<&Monitor> {
        match reference {
            MonitorRef::Index(idx) => self.monitors.get(*idx),
            MonitorRef::Name(name) => self.monitors.iter().find(|m| &m.name == name),
        }
    }

    /// Short listing of identifiers for error messages
    pub fn describe_ids(&self) -> String {
        self.monitors
            .iter()
            .map(|m| format!("{}={}", m.id, m.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn too_large(name: &str) -> BkError {
    BkError::PlatformQuery(format!("monitor {name} extends past the supported desktop size"))
}

fn to_u32(v: i64) -> Result<u32, BkError> {
    u32::try_from(v)
        .map_err(|_| BkError::PlatformQuery(format!("monitor offset {v} out of range")))
}

/// Parse an X11-style geometry `WxH+X+Y` (offsets may be negative)
pub fn parse_geometry(name: &str, spec: &str) -> Result<RawMonitor> {
    let re = Regex::new(r"^(\d+)x(\d+)([+-]\d+)([+-]\d+)$")?;
    let caps = re
        .captures(spec.trim())
        .ok_or_else(|| anyhow::anyhow!("invalid geometry '{spec}', expected WxH+X+Y"))?;

    let width: u32 = caps[1].parse()?;
    let height: u32 = caps[2].parse()?;
    if width == 0 || height == 0 {
        anyhow::bail!("invalid geometry '{spec}': size must be non-zero");
    }
    let x: i32 = caps[3].parse()?;
    let y: i32 = caps[4].parse()?;
    Ok(RawMonitor::new(name, x, y, width, height))
}

/// Parse a `--geometry` value: `WxH+X+Y` or `NAME=WxH+X+Y`.
///
/// Unnamed entries are called `geometry-<index>`.
pub fn parse_geometry_arg(index: usize, arg: &str) -> Result<RawMonitor> {
    match arg.split_once('=') {
        Some((name, spec)) => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("empty output name in geometry '{arg}'");
            }
            parse_geometry(name, spec)
        }
        None => parse_geometry(&format!("{UNNAMED_PREFIX}{index}"), arg),
    }
}

/// Where monitor geometry comes from
#[derive(Debug, Clone)]
pub enum MonitorSource {
    Geometry(Vec<RawMonitor>),
    Sway,
    Hyprland,
    Xrandr,
    #[cfg(windows)]
    Windows,
}

impl MonitorSource {
    /// Pick a source: explicit geometry first, then the session's own query
    pub fn detect(geometry: &[String]) -> Result<Self> {
        let mut specs: Vec<String> = geometry.to_vec();
        if specs.is_empty()
            && let Ok(env_specs) = std::env::var("BK_GEOMETRY")
        {
            specs = env_specs
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if !specs.is_empty() {
            let monitors = specs
                .iter()
                .enumerate()
                .map(|(i, s)| parse_geometry_arg(i, s))
                .collect::<Result<Vec<_>>>()?;
            return Ok(MonitorSource::Geometry(monitors));
        }

        #[cfg(windows)]
        {
            return Ok(MonitorSource::Windows);
        }

        #[cfg(not(windows))]
        {
            Ok(match CompositorType::detect() {
                CompositorType::Sway => MonitorSource::Sway,
                CompositorType::Hyprland => MonitorSource::Hyprland,
                CompositorType::Other => MonitorSource::Xrandr,
            })
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MonitorSource::Geometry(_) => "geometry",
            MonitorSource::Sway => "swaymsg",
            MonitorSource::Hyprland => "hyprctl",
            MonitorSource::Xrandr => "xrandr",
            #[cfg(windows)]
            MonitorSource::Windows => "win32",
        }
    }

    pub fn query(&self) -> Result<Vec<RawMonitor>> {
        match self {
            MonitorSource::Geometry(monitors) => Ok(monitors.clone()),
            MonitorSource::Sway => sway::get_outputs(),
            MonitorSource::Hyprland => hyprland::get_monitors(),
            MonitorSource::Xrandr => {
                if !DisplayServer::detect().has_x_server() {
                    anyhow::bail!("no X server available (DISPLAY is not set)");
                }
                xrandr::get_monitors()
            }
            #[cfg(windows)]
            MonitorSource::Windows => windows::get_monitors(),
        }
    }
}

/// Enumerate the active monitors.
///
/// `geometry` overrides the OS query when non-empty.
pub fn list_monitors(geometry: &[String]) -> Result<MonitorSet> {
    let source = MonitorSource::detect(geometry)?;
    ui::debug(
        "monitor.source",
        &format!("Querying monitors via {}", source.name()),
    );

    let raw = source
        .query()
        .map_err(|err| BkError::PlatformQuery(format!("{}: {err:#}", source.name())))?;
    let set = MonitorSet::new(raw)?;

    for m in set.iter() {
        ui::debug("monitor.found", &m.label());
    }
    Ok(set)
}

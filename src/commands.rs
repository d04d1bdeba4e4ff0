//! Command orchestration: enumerate, compose, apply.

use anyhow::{Context, Result};
use clap::CommandFactory;
use colored::*;
use std::io;

use crate::cli::Cli;
use crate::common::paths;
use crate::compose::{self, BackgroundAssignment, ImageSpec, color::parse_hex};
use crate::config::BkConfig;
use crate::error::BkError;
use crate::monitor::{self, MonitorSet};
use crate::ui::prelude::*;
use crate::wallpaper::{self, Backend, Layout, WallpaperStore};

const DEFAULT_COLOR: &str = "#000000";

pub fn handle(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "bk", &mut io::stdout());
        return Ok(());
    }

    let config = BkConfig::load()?;

    let monitors = monitor::list_monitors(&cli.geometry)?;
    if cli.list_monitors {
        print_monitors(&monitors);
        return Ok(());
    }

    let assignment = build_assignment(&cli, &config)?;
    let canvas = compose::compose(&monitors, &assignment)?;
    let (width, height) = canvas.dimensions();

    if let Some(output) = &cli.output {
        let output = paths::absolutize(output.clone())?;
        canvas
            .save(&output)
            .with_context(|| format!("writing {}", output.display()))?;
        emit(
            Level::Success,
            "canvas.saved",
            &format!(
                "Wrote {}x{} canvas to {}",
                width,
                height,
                output.display().to_string().green()
            ),
            Some(serde_json::json!({
                "path": output,
                "width": width,
                "height": height,
            })),
        );
        return Ok(());
    }

    let backend = cli
        .backend
        .or(config.backend)
        .or_else(Backend::detect)
        .ok_or_else(|| {
            BkError::apply(
                "auto",
                "unsupported session: no known desktop environment detected (use --backend)",
            )
        })?;

    if backend.layout() == Layout::PerOutput
        && let Some(unnamed) = monitors.iter().find(|m| !m.has_output_name())
    {
        return Err(BkError::apply(
            backend.name(),
            format!(
                "monitor {} has no output name; use --geometry NAME=WxH+X+Y with per-output backends",
                unnamed.name
            ),
        )
        .into());
    }

    let store = WallpaperStore::new(config.wallpaper_dir()?);
    wallpaper::apply(&canvas, backend, &store)?;

    emit(
        Level::Success,
        "wallpaper.applied",
        &format!(
            "Background set on {} monitor(s) via {}",
            monitors.len(),
            backend.name().cyan()
        ),
        Some(serde_json::json!({
            "backend": backend.name(),
            "monitors": monitors.len(),
            "width": width,
            "height": height,
        })),
    );
    Ok(())
}

/// Positional images first, then `--assign` bindings, which win on conflict
fn build_assignment(cli: &Cli, config: &BkConfig) -> Result<BackgroundAssignment> {
    let mode = cli.mode.or(config.mode).unwrap_or_default();
    let color_str = cli
        .color
        .as_deref()
        .or(config.color.as_deref())
        .unwrap_or(DEFAULT_COLOR);
    let color = parse_hex(color_str)?;

    let images = cli
        .images
        .iter()
        .cloned()
        .map(paths::absolutize)
        .collect::<Result<Vec<_>>>()?;
    let mut assignment = BackgroundAssignment::from_images(images, mode).with_background(color);

    for binding in &cli.assign {
        let path = paths::absolutize(binding.path.clone())?;
        assignment.bind(
            binding.monitor.clone(),
            ImageSpec::new(path, binding.mode.unwrap_or(mode)),
        );
    }
    Ok(assignment)
}

fn print_monitors(monitors: &MonitorSet) {
    let (width, height) = monitors.virtual_size();
    for m in monitors.iter() {
        emit(
            Level::Info,
            "monitor.info",
            &m.label(),
            serde_json::to_value(m).ok(),
        );
    }
    if get_output_format() == OutputFormat::Text {
        emit(
            Level::Info,
            "monitor.virtual",
            &format!("virtual desktop: {}x{}", width, height).dimmed().to_string(),
            None,
        );
    }
}

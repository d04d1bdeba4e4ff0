use clap::Parser;
use std::path::PathBuf;

use crate::common::paths;
use crate::compose::FitMode;
use crate::monitor::MonitorRef;
use crate::ui::OutputFormat;
use crate::wallpaper::Backend;

/// bk main parser
#[derive(Parser, Debug)]
#[command(
    name = "bk",
    author,
    version,
    about = "Change the desktop background on GNU/Linux and Windows",
    long_about = "Change the desktop background on GNU/Linux and Windows.\n\n\
        A single IMAGE is shown on every monitor. Several IMAGEs are assigned \
        to monitors in order, left to right. Use --assign to bind an image to \
        a monitor by index or output name."
)]
pub struct Cli {
    /// Image files to use as the background
    #[arg(
        value_name = "IMAGE",
        required_unless_present_any = ["assign", "list_monitors", "completions"]
    )]
    pub images: Vec<PathBuf>,

    /// Bind an image to one monitor: MONITOR[:MODE]=PATH (repeatable)
    #[arg(short, long, value_name = "MONITOR=PATH", value_parser = parse_binding)]
    pub assign: Vec<Binding>,

    /// How images fill their monitor
    #[arg(short, long, value_enum)]
    pub mode: Option<FitMode>,

    /// Background color for uncovered areas, as #rrggbb
    #[arg(short, long, value_name = "HEX")]
    pub color: Option<String>,

    /// Use this monitor geometry instead of querying the system (repeatable).
    /// Prefix with NAME= to give the output name per-output backends need.
    #[arg(short, long, value_name = "[NAME=]WxH+X+Y")]
    pub geometry: Vec<String>,

    /// Force the background setter instead of detecting it
    #[arg(short, long, value_enum)]
    pub backend: Option<Backend>,

    /// Write the composed image to PATH instead of applying it
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the detected monitors and exit
    #[arg(short, long)]
    pub list_monitors: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Activate debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// An explicit `--assign` binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub monitor: MonitorRef,
    pub mode: Option<FitMode>,
    pub path: PathBuf,
}

fn parse_binding(s: &str) -> Result<Binding, String> {
    let (target, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MONITOR=PATH, got '{s}'"))?;
    if path.is_empty() {
        return Err(format!("missing image path in '{s}'"));
    }

    let (monitor, mode) = match target.rsplit_once(':') {
        Some((monitor, mode)) => match mode.parse::<FitMode>() {
            Ok(mode) => (monitor, Some(mode)),
            Err(e) => return Err(e.to_string()),
        },
        None => (target, None),
    };

    Ok(Binding {
        monitor: monitor.parse().map_err(|e: anyhow::Error| e.to_string())?,
        mode,
        path: paths::expand_path(path).map_err(|e| e.to_string())?,
    })
}

mod cli;
mod commands;
mod common;
mod compose;
mod config;
mod error;
mod monitor;
mod ui;
mod wallpaper;

use clap::Parser;

use crate::cli::Cli;
use crate::ui::prelude::*;

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    ui::init(cli.format, !cli.no_color);
    ui::set_debug_mode(cli.debug || ui::debug_env_enabled());

    if let Err(err) = commands::handle(cli) {
        emit(Level::Error, "bk.error", &format!("Error: {err:#}"), None);
        std::process::exit(error::exit_code_for(&err));
    }
}

use anyhow::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the bk binary isolated from the caller's session and config
pub fn run_bk_command(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    run_bk_command_with_env(env, args, &[])
}

pub fn run_bk_command_with_env(
    env: &TestEnvironment,
    args: &[&str],
    vars: &[(&str, OsString)],
) -> Result<CommandOutput> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bk"));
    cmd.args(args)
        .current_dir(env.path())
        .env("BK_CONFIG", env.config_path())
        .env("XDG_DATA_HOME", env.path().join("data"))
        .env_remove("BK_GEOMETRY")
        .env_remove("BK_DEBUG")
        .env_remove("XDG_CURRENT_DESKTOP")
        .env_remove("XDG_SESSION_DESKTOP")
        .env_remove("DESKTOP_SESSION");
    for (key, value) in vars {
        cmd.env(key, value);
    }

    let output = cmd.output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

pub fn path_arg(path: &Path) -> &str {
    path.to_str().expect("test paths are UTF-8")
}

pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}

/// Wallpaper files bk wrote into `dir`, sorted by name
pub fn wallpaper_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.exists() {
        return Ok(files);
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if name.starts_with("bk-") && name.ends_with(".png") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Install an executable shell script named `name` into `dir`
#[cfg(unix)]
pub fn install_stub(dir: &Path, name: &str, script: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, script)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// `PATH` with `dir` searched first
#[cfg(unix)]
pub fn path_with(dir: &Path) -> Result<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(existing) = std::env::var_os("PATH") {
        entries.extend(std::env::split_paths(&existing));
    }
    Ok(std::env::join_paths(entries)?)
}

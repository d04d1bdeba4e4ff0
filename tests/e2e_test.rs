mod common;
mod utils;

use anyhow::Result;
use common::TestEnvironment;
use utils::{image_dimensions, path_arg, run_bk_command};

#[test]
fn test_single_image_spans_two_monitors() -> Result<()> {
    let env = TestEnvironment::new()?;
    let img = env.solid_image("red.png", 800, 600, [255, 0, 0, 255])?;
    let out = env.path().join("canvas.png");

    let output = run_bk_command(
        &env,
        &[
            path_arg(&img),
            "-g",
            "1920x1080+0+0",
            "-g",
            "1280x1024+1920+0",
            "-o",
            path_arg(&out),
        ],
    )?;
    assert_eq!(output.exit_code, 0, "bk failed: {}", output.stderr);

    assert_eq!(image_dimensions(&out)?, (3200, 1080));
    let canvas = image::open(&out)?.to_rgba8();
    assert_eq!(canvas.get_pixel(10, 10).0, [255, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(3000, 500).0, [255, 0, 0, 255]);
    // below the shorter monitor
    assert_eq!(canvas.get_pixel(3000, 1050).0, [0, 0, 0, 255]);
    Ok(())
}

#[test]
fn test_fill_800x600_on_full_hd() -> Result<()> {
    let env = TestEnvironment::new()?;
    let img = env.solid_image("blue.png", 800, 600, [0, 0, 255, 255])?;
    let out = env.path().join("fill.png");

    let output = run_bk_command(
        &env,
        &[
            path_arg(&img),
            "--mode",
            "fill",
            "--geometry",
            "1920x1080+0+0",
            "--output",
            path_arg(&out),
        ],
    )?;
    assert_eq!(output.exit_code, 0, "bk failed: {}", output.stderr);

    let canvas = image::open(&out)?.to_rgba8();
    assert_eq!(canvas.dimensions(), (1920, 1080));
    assert!(canvas.pixels().all(|p| p.0 == [0, 0, 255, 255]));
    Ok(())
}

#[test]
fn test_center_uses_background_color() -> Result<()> {
    let env = TestEnvironment::new()?;
    let img = env.solid_image("dot.png", 10, 10, [255, 255, 255, 255])?;
    let out = env.path().join("center.png");

    let output = run_bk_command(
        &env,
        &[
            path_arg(&img),
            "-m",
            "center",
            "-c",
            "#00ff00",
            "-g",
            "100x100+0+0",
            "-o",
            path_arg(&out),
        ],
    )?;
    assert_eq!(output.exit_code, 0, "bk failed: {}", output.stderr);

    let canvas = image::open(&out)?.to_rgba8();
    assert_eq!(canvas.get_pixel(0, 0).0, [0, 255, 0, 255]);
    assert_eq!(canvas.get_pixel(50, 50).0, [255, 255, 255, 255]);
    Ok(())
}

#[test]
fn test_config_supplies_defaults() -> Result<()> {
    let env = TestEnvironment::new()?;
    env.write_config("mode = \"center\"\ncolor = \"#0000ff\"\n")?;
    let img = env.solid_image("dot.png", 10, 10, [255, 255, 255, 255])?;
    let out = env.path().join("cfg.png");

    let output = run_bk_command(
        &env,
        &[path_arg(&img), "-g", "40x40+0+0", "-o", path_arg(&out)],
    )?;
    assert_eq!(output.exit_code, 0, "bk failed: {}", output.stderr);

    let canvas = image::open(&out)?.to_rgba8();
    assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 255, 255]);
    Ok(())
}

#[test]
fn test_per_monitor_assignment() -> Result<()> {
    let env = TestEnvironment::new()?;
    let red = env.solid_image("red.png", 64, 64, [255, 0, 0, 255])?;
    let green = env.solid_image("green.png", 64, 64, [0, 255, 0, 255])?;
    let out = env.path().join("pair.png");

    let output = run_bk_command(
        &env,
        &[
            path_arg(&red),
            path_arg(&green),
            "-g",
            "200x100+0+0",
            "-g",
            "200x100+200+0",
            "-o",
            path_arg(&out),
        ],
    )?;
    assert_eq!(output.exit_code, 0, "bk failed: {}", output.stderr);

    let canvas = image::open(&out)?.to_rgba8();
    assert_eq!(canvas.get_pixel(100, 50).0, [255, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(300, 50).0, [0, 255, 0, 255]);
    Ok(())
}

#[test]
fn test_unknown_monitor_writes_nothing() -> Result<()> {
    let env = TestEnvironment::new()?;
    let img = env.solid_image("red.png", 64, 64, [255, 0, 0, 255])?;
    let out = env.path().join("never.png");
    let binding = format!("2={}", path_arg(&img));

    let output = run_bk_command(
        &env,
        &[
            "-a",
            &binding,
            "-g",
            "100x100+0+0",
            "-g",
            "100x100+100+0",
            "-o",
            path_arg(&out),
        ],
    )?;
    assert_eq!(output.exit_code, 5, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("'2'"));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn test_non_image_file_rejected() -> Result<()> {
    let env = TestEnvironment::new()?;
    let bogus = env.path().join("notes.png");
    std::fs::write(&bogus, "this is not an image")?;
    let out = env.path().join("never.png");

    let output = run_bk_command(
        &env,
        &[path_arg(&bogus), "-g", "100x100+0+0", "-o", path_arg(&out)],
    )?;
    assert_eq!(output.exit_code, 4, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("notes.png"));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn test_missing_arguments_is_usage_error() -> Result<()> {
    let env = TestEnvironment::new()?;
    let output = run_bk_command(&env, &[])?;
    assert_eq!(output.exit_code, 2);
    Ok(())
}

#[test]
fn test_list_monitors_json() -> Result<()> {
    let env = TestEnvironment::new()?;
    let output = run_bk_command(
        &env,
        &[
            "--list-monitors",
            "--format",
            "json",
            "-g",
            "1280x1024-1280+0",
            "-g",
            "1920x1080+0+0",
        ],
    )?;
    assert_eq!(output.exit_code, 0, "bk failed: {}", output.stderr);

    let events: Vec<serde_json::Value> = output
        .stdout
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["data"]["name"], "geometry-0");
    assert_eq!(events[0]["data"]["x"], 0);
    assert_eq!(events[1]["data"]["x"], 1280);
    assert_eq!(events[1]["data"]["width"], 1920);
    Ok(())
}

#[test]
fn test_geometry_from_environment() -> Result<()> {
    let env = TestEnvironment::new()?;
    let img = env.solid_image("red.png", 8, 8, [255, 0, 0, 255])?;
    let out = env.path().join("env.png");

    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_bk"));
    let status = cmd
        .args([path_arg(&img), "-o", path_arg(&out)])
        .env("BK_CONFIG", env.config_path())
        .env("BK_GEOMETRY", "300x200+0+0, 100x50+300+0")
        .status()?;
    assert!(status.success());
    assert_eq!(image_dimensions(&out)?, (400, 200));
    Ok(())
}

#[cfg(not(windows))]
#[test]
fn test_windows_backend_fails_to_apply_elsewhere() -> Result<()> {
    let env = TestEnvironment::new()?;
    let img = env.solid_image("red.png", 8, 8, [255, 0, 0, 255])?;
    let walls = env.path().join("walls");
    env.write_config(&format!("wallpaper_dir = \"{}\"\n", path_arg(&walls)))?;

    let output = run_bk_command(
        &env,
        &[path_arg(&img), "-g", "100x100+0+0", "--backend", "windows"],
    )?;
    assert_eq!(output.exit_code, 6, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("windows"));
    Ok(())
}

#[test]
fn test_oversized_geometry_is_reported() -> Result<()> {
    let env = TestEnvironment::new()?;
    let img = env.solid_image("red.png", 8, 8, [255, 0, 0, 255])?;
    let out = env.path().join("huge.png");

    let output = run_bk_command(
        &env,
        &[
            path_arg(&img),
            "-g",
            "4294967295x4294967295+0+0",
            "-o",
            path_arg(&out),
        ],
    )?;
    assert_eq!(output.exit_code, 3, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("Error"));
    assert!(output.stderr.contains("too large"));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn test_per_output_backend_needs_output_names() -> Result<()> {
    let env = TestEnvironment::new()?;
    let img = env.solid_image("red.png", 8, 8, [255, 0, 0, 255])?;
    let walls = env.path().join("walls");
    env.write_config(&format!("wallpaper_dir = \"{}\"\n", path_arg(&walls)))?;

    let output = run_bk_command(
        &env,
        &[path_arg(&img), "-g", "100x100+0+0", "--backend", "sway"],
    )?;
    assert_eq!(output.exit_code, 6, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("NAME=WxH+X+Y"));
    assert!(utils::wallpaper_files(&walls)?.is_empty());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_sway_gets_one_crop_per_output_and_prunes() -> Result<()> {
    let env = TestEnvironment::new()?;
    let walls = env.path().join("walls");
    env.write_config(&format!("wallpaper_dir = \"{}\"\n", path_arg(&walls)))?;

    let bin = env.path().join("bin");
    let log = env.path().join("swaymsg.log");
    utils::install_stub(&bin, "swaymsg", "#!/bin/sh\nprintf '%s\\n' \"$*\" >> \"$BK_STUB_LOG\"\n")?;
    let vars = [
        ("PATH", utils::path_with(&bin)?),
        ("BK_STUB_LOG", log.clone().into_os_string()),
    ];

    let red = env.solid_image("red.png", 32, 32, [255, 0, 0, 255])?;
    let args = |img: &std::path::Path| {
        vec![
            path_arg(img).to_string(),
            "-m".into(),
            "stretch".into(),
            "-g".into(),
            "DP-1=200x100+0+0".into(),
            "-g".into(),
            "HDMI-A-1=300x150+200+0".into(),
            "--backend".into(),
            "sway".into(),
        ]
    };

    let first_args = args(&red);
    let first_args: Vec<&str> = first_args.iter().map(String::as_str).collect();
    let output = utils::run_bk_command_with_env(&env, &first_args, &vars)?;
    assert_eq!(output.exit_code, 0, "bk failed: {}", output.stderr);

    let first = utils::wallpaper_files(&walls)?;
    assert_eq!(first.len(), 2);
    let mut sizes: Vec<(u32, u32)> = first
        .iter()
        .map(|p| image_dimensions(p))
        .collect::<Result<_>>()?;
    sizes.sort();
    assert_eq!(sizes, vec![(200, 100), (300, 150)]);

    let calls = std::fs::read_to_string(&log)?;
    let lines: Vec<&str> = calls.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("output \"DP-1\" bg \""));
    assert!(lines[1].starts_with("output \"HDMI-A-1\" bg \""));
    assert!(lines.iter().all(|l| l.ends_with("\" stretch")));
    for file in &first {
        assert!(calls.contains(path_arg(file)));
    }

    let green = env.solid_image("green.png", 32, 32, [0, 255, 0, 255])?;
    let second_args = args(&green);
    let second_args: Vec<&str> = second_args.iter().map(String::as_str).collect();
    let output = utils::run_bk_command_with_env(&env, &second_args, &vars)?;
    assert_eq!(output.exit_code, 0, "bk failed: {}", output.stderr);

    let second = utils::wallpaper_files(&walls)?;
    assert_eq!(second.len(), 2);
    for old in &first {
        assert!(!old.exists(), "{} was not pruned", old.display());
    }
    Ok(())
}

use anyhow::{Context, Result};

use super::{OutputImage, file_uri};
use crate::common::command;

/// qdbus binaries: Plasma 6, Plasma 5, and the name some distros use for 5
const QDBUS: &[&str] = &["qdbus6", "qdbus", "qdbus-qt5"];

/// Set one image per screen through the PlasmaShell scripting API.
///
/// Plasma numbers screens its own way, so desktops are matched to monitors
/// by the OS position of their screen.
pub fn apply_wallpaper(outputs: &[OutputImage], origin: (i64, i64)) -> Result<()> {
    let qdbus = QDBUS
        .iter()
        .copied()
        .find(|exe| command::has_tool(exe))
        .ok_or_else(|| anyhow::anyhow!("qdbus not found (tried {})", QDBUS.join(", ")))?;

    let script = plasma_script(outputs, origin)?;
    command::run_checked(
        qdbus,
        &[
            "org.kde.plasmashell",
            "/PlasmaShell",
            "org.kde.PlasmaShell.evaluateScript",
            &script,
        ],
    )
    .with_context(|| format!("run {qdbus} PlasmaShell.evaluateScript"))?;
    Ok(())
}

fn plasma_script(outputs: &[OutputImage], origin: (i64, i64)) -> Result<String> {
    let mut files = serde_json::Map::new();
    for output in outputs {
        let x = i64::from(output.monitor.x) + origin.0;
        let y = i64::from(output.monitor.y) + origin.1;
        files.insert(
            format!("{x},{y}"),
            serde_json::Value::String(file_uri(&output.path)?),
        );
    }
    let files = serde_json::Value::Object(files).to_string();

    Ok(format!(
        r#"var files = {files};
desktops().forEach(function (d) {{
    var g = screenGeometry(d.screen);
    var uri = files[g.x + "," + g.y];
    if (!uri) {{ return; }}
    d.wallpaperPlugin = "org.kde.image";
    d.currentConfigGroup = Array("Wallpaper", "org.kde.image", "General");
    d.writeConfig("Image", uri);
    d.writeConfig("FillMode", 0);
    d.reloadConfig();
}});
"#
    ))
}

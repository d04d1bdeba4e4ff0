use anyhow::{Context, Result};

use super::{OutputImage, require_tool};
use crate::common::command;

pub fn apply_wallpaper(outputs: &[OutputImage]) -> Result<()> {
    require_tool("swaymsg")?;

    for output in outputs {
        // swaymsg output "<name>" bg "<path>" stretch
        let cmd = bg_command(&output.monitor.name, &output.path.display().to_string());
        command::run_checked("swaymsg", &[&cmd])
            .with_context(|| format!("setting background of {}", output.monitor.name))?;
    }
    Ok(())
}

fn bg_command(output: &str, path: &str) -> String {
    format!("output {} bg {} stretch", quote(output), quote(path))
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bg_command() {
        assert_eq!(
            bg_command("HDMI-A-1", "/home/me/.local/share/bk/wallpaper/bk-1.png"),
            "output \"HDMI-A-1\" bg \"/home/me/.local/share/bk/wallpaper/bk-1.png\" stretch"
        );
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }
}

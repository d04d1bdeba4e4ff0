use anyhow::{Context, Result};
use std::path::Path;

use super::{file_uri, require_tool};
use crate::common::command;

/// gsettings schema family of a GNOME-derived desktop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Gnome,
    Cinnamon,
    Mate,
}

impl Schema {
    fn id(&self) -> &'static str {
        match self {
            Schema::Gnome => "org.gnome.desktop.background",
            Schema::Cinnamon => "org.cinnamon.desktop.background",
            Schema::Mate => "org.mate.background",
        }
    }

    /// (key, value) pairs to write for `path`; the first one is required
    fn settings(&self, path: &Path) -> Result<Vec<(&'static str, String)>> {
        Ok(match self {
            Schema::Gnome => {
                let uri = file_uri(path)?;
                vec![
                    ("picture-uri", uri.clone()),
                    ("picture-options", "spanned".to_string()),
                    // GNOME 42+ keeps a separate image for the dark style.
                    ("picture-uri-dark", uri),
                ]
            }
            Schema::Cinnamon => vec![
                ("picture-uri", file_uri(path)?),
                ("picture-options", "spanned".to_string()),
            ],
            Schema::Mate => vec![
                ("picture-filename", path.display().to_string()),
                ("picture-options", "spanned".to_string()),
            ],
        })
    }
}

pub fn apply_wallpaper(schema: Schema, path: &Path) -> Result<()> {
    require_tool("gsettings")?;

    let settings = schema.settings(path)?;
    for (key, value) in settings.iter().map(|(k, v)| (*k, v.as_str())) {
        let result = command::run_checked("gsettings", &["set", schema.id(), key, value]);
        match result {
            Ok(_) => {}
            // Only the dark variant may be missing on older releases.
            Err(_) if key == "picture-uri-dark" => {}
            Err(err) => {
                return Err(err).with_context(|| format!("setting {} {}", schema.id(), key));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gnome_settings_span_and_dark_variant() {
        let s = Schema::Gnome.settings(Path::new("/w/bk-1.png")).unwrap();
        assert_eq!(s[0], ("picture-uri", "file:///w/bk-1.png".to_string()));
        assert!(s.contains(&("picture-options", "spanned".to_string())));
        assert!(s.iter().any(|(k, _)| *k == "picture-uri-dark"));
    }

    #[test]
    fn test_mate_uses_plain_filename() {
        let s = Schema::Mate.settings(Path::new("/w/bk-1.png")).unwrap();
        assert_eq!(s[0], ("picture-filename", "/w/bk-1.png".to_string()));
        assert_eq!(Schema::Mate.id(), "org.mate.background");
    }

    #[test]
    fn test_cinnamon_schema() {
        assert_eq!(Schema::Cinnamon.id(), "org.cinnamon.desktop.background");
        let s = Schema::Cinnamon.settings(Path::new("/w/a.png")).unwrap();
        assert_eq!(s.len(), 2);
    }
}

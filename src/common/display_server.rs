use std::env;

use super::command::is_process_running;

/// Display server types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    Wayland,
    X11,
    Windows,
    Unknown,
}

impl DisplayServer {
    /// Detect the current display server type
    pub fn detect() -> Self {
        if cfg!(windows) {
            return DisplayServer::Windows;
        }

        // XDG_SESSION_TYPE is the most reliable hint
        if let Ok(session_type) = env::var("XDG_SESSION_TYPE") {
            match session_type.to_lowercase().as_str() {
                "wayland" => return DisplayServer::Wayland,
                "x11" => return DisplayServer::X11,
                _ => {}
            }
        }

        Self::from_env_vars(
            env::var_os("WAYLAND_DISPLAY").is_some(),
            env::var_os("DISPLAY").is_some(),
        )
        .unwrap_or_else(|| {
            if ["sway", "Hyprland", "river", "wayfire", "labwc"]
                .iter()
                .any(|p| is_process_running(p))
            {
                DisplayServer::Wayland
            } else {
                DisplayServer::Unknown
            }
        })
    }

    fn from_env_vars(has_wayland: bool, has_x11: bool) -> Option<Self> {
        if has_wayland {
            Some(DisplayServer::Wayland)
        } else if has_x11 {
            Some(DisplayServer::X11)
        } else {
            None
        }
    }

    /// Whether an X server (native or XWayland) may answer xrandr
    pub fn has_x_server(&self) -> bool {
        match self {
            DisplayServer::X11 => true,
            DisplayServer::Wayland => env::var_os("DISPLAY").is_some(),
            _ => false,
        }
    }
}

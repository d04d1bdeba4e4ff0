use std::env;

use super::command::is_process_running;

/// Window compositor types that expose their own output query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositorType {
    /// Sway compositor (i3-compatible Wayland compositor)
    Sway,
    /// Hyprland compositor (dynamic tiling Wayland compositor)
    Hyprland,
    /// Anything else, including plain X11 sessions
    Other,
}

impl CompositorType {
    /// Detect the current window compositor
    pub fn detect() -> Self {
        if env::var_os("SWAYSOCK").is_some() {
            return CompositorType::Sway;
        }
        if env::var_os("HYPRLAND_INSTANCE_SIGNATURE").is_some() {
            return CompositorType::Hyprland;
        }

        for var in ["XDG_SESSION_DESKTOP", "DESKTOP_SESSION"] {
            if let Ok(session) = env::var(var)
                && let Some(found) = Self::from_session_name(&session)
            {
                return found;
            }
        }

        if env::var_os("WAYLAND_DISPLAY").is_some() {
            if is_process_running("sway") {
                return CompositorType::Sway;
            }
            if is_process_running("Hyprland") {
                return CompositorType::Hyprland;
            }
        }

        CompositorType::Other
    }

    fn from_session_name(session: &str) -> Option<Self> {
        match session.to_lowercase().as_str() {
            "sway" => Some(CompositorType::Sway),
            "hyprland" => Some(CompositorType::Hyprland),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_name_is_case_insensitive() {
        assert_eq!(
            CompositorType::from_session_name("Hyprland"),
            Some(CompositorType::Hyprland)
        );
        assert_eq!(
            CompositorType::from_session_name("SWAY"),
            Some(CompositorType::Sway)
        );
        assert_eq!(CompositorType::from_session_name("gnome"), None);
    }
}

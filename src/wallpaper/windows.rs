use anyhow::Result;
use std::ffi::{OsStr, c_void};
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows_sys::Win32::Foundation::ERROR_SUCCESS;
use windows_sys::Win32::System::Registry::{HKEY_CURRENT_USER, REG_SZ, RegSetKeyValueW};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    SPI_SETDESKWALLPAPER, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SystemParametersInfoW,
};

const DESKTOP_KEY: &str = r"Control Panel\Desktop";
/// "Span" across all monitors
const STYLE_SPAN: &str = "22";

fn wide(s: impl AsRef<OsStr>) -> Vec<u16> {
    s.as_ref().encode_wide().chain(std::iter::once(0)).collect()
}

fn set_desktop_value(name: &str, value: &str) -> Result<()> {
    let key = wide(DESKTOP_KEY);
    let name_w = wide(name);
    let data = wide(value);

    // SAFETY: all buffers are NUL-terminated and outlive the call.
    let status = unsafe {
        RegSetKeyValueW(
            HKEY_CURRENT_USER,
            key.as_ptr(),
            name_w.as_ptr(),
            REG_SZ,
            data.as_ptr() as *const c_void,
            (data.len() * std::mem::size_of::<u16>()) as u32,
        )
    };
    if status != ERROR_SUCCESS {
        anyhow::bail!(
            "RegSetKeyValueW({name}) failed: {}",
            std::io::Error::from_raw_os_error(status as i32)
        );
    }
    Ok(())
}

pub fn apply_wallpaper(path: &Path) -> Result<()> {
    set_desktop_value("WallpaperStyle", STYLE_SPAN)?;
    set_desktop_value("TileWallpaper", "0")?;

    let mut file = wide(path.as_os_str());
    // SAFETY: `file` is a NUL-terminated UTF-16 path that outlives the call.
    let ok = unsafe {
        SystemParametersInfoW(
            SPI_SETDESKWALLPAPER,
            0,
            file.as_mut_ptr() as *mut c_void,
            SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
        )
    };
    if ok == 0 {
        anyhow::bail!(
            "SystemParametersInfoW failed: {}",
            std::io::Error::last_os_error()
        );
    }
    Ok(())
}

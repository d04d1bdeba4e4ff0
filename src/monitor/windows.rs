//! Win32 monitor query via `EnumDisplayMonitors`.

use anyhow::Result;
use std::mem;
use std::ptr;

use windows_sys::Win32::Foundation::{BOOL, LPARAM, RECT, TRUE};
use windows_sys::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOEXW,
};

use super::RawMonitor;

const MONITORINFOF_PRIMARY: u32 = 1;

pub fn get_monitors() -> Result<Vec<RawMonitor>> {
    let mut monitors: Vec<RawMonitor> = Vec::new();

    // SAFETY: the callback only runs during this call and the pointer refers
    // to a live Vec on this stack frame.
    let ok = unsafe {
        EnumDisplayMonitors(
            ptr::null_mut(),
            ptr::null(),
            Some(enum_monitor),
            &mut monitors as *mut Vec<RawMonitor> as LPARAM,
        )
    };
    if ok == 0 {
        anyhow::bail!(
            "EnumDisplayMonitors failed: {}",
            std::io::Error::last_os_error()
        );
    }
    Ok(monitors)
}

unsafe extern "system" fn enum_monitor(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    data: LPARAM,
) -> BOOL {
    let monitors = unsafe { &mut *(data as *mut Vec<RawMonitor>) };

    let mut info: MONITORINFOEXW = unsafe { mem::zeroed() };
    info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
    let ok = unsafe { GetMonitorInfoW(hmonitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO) };
    if ok == 0 {
        // Skip this monitor, keep enumerating.
        return TRUE;
    }

    let rc = info.monitorInfo.rcMonitor;
    let len = info
        .szDevice
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(info.szDevice.len());
    let name = String::from_utf16_lossy(&info.szDevice[..len]);

    let mut monitor = RawMonitor::new(
        name,
        rc.left,
        rc.top,
        (rc.right - rc.left).max(0) as u32,
        (rc.bottom - rc.top).max(0) as u32,
    );
    monitor.primary = info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0;
    monitors.push(monitor);
    TRUE
}

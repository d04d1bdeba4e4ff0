use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::path::Path;

/// Write `bytes` to `path` so readers see either the old file or the new one.
///
/// The data goes to a temporary file in the same directory which is then
/// renamed over the target.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".bk-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("create temporary file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|e| anyhow!(e.error))
        .with_context(|| format!("rename into {}", path.display()))?;
    Ok(())
}

//! Small filesystem helpers shared by every on-disk record.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Write `bytes` to `path` atomically.
///
/// The data goes to a hidden temp file in the same directory, which is then
/// renamed over the target, so readers see either the old file or the new
/// one and never a half-written mix.  Missing parent directories are
/// created.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = parent_dir(path);
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path);
    fs::write(&tmp_path, bytes)?;
    restrict_permissions(&tmp_path);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// The temp file used by [`write_atomic`] for `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    parent_dir(path).join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Owner-only read/write on Unix; no-op elsewhere.
pub fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    let _ = path;
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new("."))
}

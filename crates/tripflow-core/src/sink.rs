//! Report persistence and viewer hand-off.
//!
//! Failures here are the caller's to log; a failed write or viewer launch
//! must not revoke an otherwise-successful run's console output.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Write the rendered report to `path`, overwriting any existing file and
/// creating parent directories as needed.
pub fn persist_report<P: AsRef<Path>>(path: P, html: &str) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).with_context(|| {
                format!("failed to create report directory {}", parent.display())
            })?;
        }
    }
    let mut file = File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    file.write_all(html.as_bytes())
        .with_context(|| format!("failed to write report file {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// Hand the persisted report to the platform file opener.
pub fn launch_viewer<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    open::that(path).with_context(|| format!("failed to open report {}", path.display()))
}

//! Shared helpers for the relocate command

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Format a byte size as a human-readable string
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Check that `path` names an existing regular file
pub fn ensure_path_to_a_file(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CliError::input(format!("{}: {}", path.display(), e)))?;

    if metadata.is_dir() {
        return Err(CliError::input(format!(
            "{} is a directory. Expecting a helm chart tarball",
            path.display()
        )));
    }
    Ok(())
}

/// Output path used when none is given: the chart path with `.tgz` appended
#[must_use]
pub fn default_output_path(chart: &Path) -> PathBuf {
    let mut name = OsString::from(chart.as_os_str());
    name.push(".tgz");
    PathBuf::from(name)
}

/// Whether two paths refer to the same file, resolving symlinks when they exist
#[must_use]
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

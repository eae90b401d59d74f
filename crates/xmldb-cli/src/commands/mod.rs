pub mod check;
pub mod completions;
pub mod print;
pub mod validate;

use std::path::{Path, PathBuf};

use crate::config::CliConfig;
use crate::error::CliError;

/// File name searched for inside directories.
pub const INSTALL_FILE: &str = "install.xml";

/// Command-line paths, or the configured defaults when none were given.
pub fn requested_paths(paths: &[PathBuf], config: &CliConfig) -> Vec<PathBuf> {
    if paths.is_empty() {
        config.check.default_paths.clone()
    } else {
        paths.to_vec()
    }
}

/// Expand paths into a sorted, de-duplicated list of install.xml files.
///
/// Files are used directly and directories are searched recursively for
/// `**/install.xml`. Paths that do not exist are kept so the batch can
/// apply its missing-file policy to them.
pub fn discover(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let found = find_install_files(path)?;
            tracing::debug!(dir = %path.display(), found = found.len(), "searched directory");
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    if files.is_empty() {
        let display_path = paths.first().cloned().unwrap_or_else(|| PathBuf::from("."));
        return Err(CliError::NoInstallFiles { path: display_path });
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn find_install_files(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let root = glob::Pattern::escape(&dir.display().to_string());
    let pattern = format!("{root}/**/{INSTALL_FILE}");
    let entries = glob::glob(&pattern).map_err(|e| CliError::Other(e.to_string()))?;
    entries
        .map(|entry| entry.map_err(|e| CliError::Other(e.to_string())))
        .collect()
}

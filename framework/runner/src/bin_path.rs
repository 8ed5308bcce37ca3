use anyhow::bail;
use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::types::GaugeResult;

/// Resolve the executable used to launch the service.
///
/// A bare name, such as the default `java`, is looked up in the user's `PATH`. Anything that looks
/// like a path must exist.
pub(crate) fn resolve_executable(path: &Path) -> GaugeResult<PathBuf> {
    if path.as_os_str().is_empty() {
        bail!("Path to the executable used to run the service is empty");
    }

    let is_bare_name = path
        .parent()
        .map_or(true, |parent| parent.as_os_str().is_empty());
    if is_bare_name {
        log::debug!("'{}' is not a path so looking in user's 'PATH'", path.display());
        return which::which(path).with_context(|| {
            format!(
                "'{}' not found in PATH. Please install it or pass the full path with '--java'.",
                path.display()
            )
        });
    }

    if !path.exists() {
        bail!(
            "Executable used to run the service set to '{}' but that path doesn't exist",
            path.display()
        );
    }

    Ok(path.to_path_buf())
}

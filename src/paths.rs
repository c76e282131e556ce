//! Build/install directory resolution and cleanup.
//!
//! Directory templates use CMake's `${sourceDir}` macro; everything here is
//! anchored at the project root named by the `PROJECT_DIR` environment
//! variable (or a CLI override). Resolution consults the inheritance chain,
//! so a concrete preset normally picks its `binaryDir` up from its hidden
//! base.

use crate::inherit;
use crate::registry::PresetRegistry;
use crate::ui;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the project root directory.
pub const PROJECT_DIR_ENV: &str = "PROJECT_DIR";

/// The project root for this invocation. A missing or invalid root is a
/// fatal configuration error for any operation that touches the filesystem.
pub fn project_root(cli_override: Option<&Path>) -> Result<PathBuf> {
    let root = match cli_override {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(std::env::var_os(PROJECT_DIR_ENV).with_context(|| {
            format!("{PROJECT_DIR_ENV} is not set; export it or pass --project-dir")
        })?),
    };
    if !root.is_dir() {
        bail!("project root '{}' is not a directory", root.display());
    }
    Ok(root)
}

/// Substitute `${sourceDir}` with the project root.
pub fn expand_source_dir(template: &str, root: &Path) -> String {
    template.replace("${sourceDir}", &root.to_string_lossy())
}

fn anchored(path: PathBuf, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

/// The build directory of a configure preset, resolved through the
/// inheritance chain and made absolute. A concrete preset without a
/// `binaryDir` anywhere in its chain cannot be built or cleaned.
pub fn resolve_binary_dir(
    registry: &PresetRegistry<'_>,
    preset_name: &str,
    root: &Path,
) -> Result<PathBuf> {
    let template = inherit::resolve_str(registry, preset_name, "binaryDir").with_context(|| {
        format!("configure preset '{preset_name}' does not define a binaryDir")
    })?;
    Ok(anchored(
        PathBuf::from(expand_source_dir(&template, root)),
        root,
    ))
}

/// The install directory for a configure preset. An inherited
/// `CMAKE_INSTALL_PREFIX` wins: absolute is used as-is, relative is joined
/// to the project root. Without one, the operator-supplied `requested` path
/// must be relative to the root.
pub fn resolve_install_dir(
    registry: &PresetRegistry<'_>,
    preset_name: &str,
    root: &Path,
    requested: Option<&str>,
) -> Result<PathBuf> {
    if let Some(prefix) = inherit::resolve_str(registry, preset_name, "CMAKE_INSTALL_PREFIX") {
        return Ok(anchored(PathBuf::from(prefix), root));
    }
    let requested = requested.with_context(|| {
        format!(
            "configure preset '{preset_name}' does not define CMAKE_INSTALL_PREFIX; pass an install directory"
        )
    })?;
    if Path::new(requested).is_absolute() {
        bail!("install directory must be relative to the project root, got '{requested}'");
    }
    Ok(root.join(requested))
}

/// Recursively delete `dir` if it exists. Failure to delete aborts the
/// operation that requested the cleanup.
pub fn clean_tree(dir: &Path, what: &str) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove {what} {}", dir.display()))?;
        ui::status(format!("Removed {what} {}", dir.display()));
    } else {
        ui::note(format!("{what} {} does not exist, nothing to clean", dir.display()));
    }
    Ok(())
}

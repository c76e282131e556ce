use super::{load_workspace, pick_preset};
use crate::paths;
use crate::registry::PresetRegistry;
use crate::resolve;
use crate::runner::{self, ExecEnv};
use crate::ui;
use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

/// Clean a configure preset's build directory: drop `CMakeCache.txt`, give
/// the build tool's `clean` target a chance, then delete the tree.
pub fn clean(project_dir: Option<&Path>, preset: Option<String>) -> Result<()> {
    let workspace = load_workspace(project_dir)?;
    let registry = PresetRegistry::build(&workspace.file);
    let names = resolve::visible_configure_presets(&workspace.file, &workspace.host)
        .iter()
        .map(|p| p.name.clone())
        .collect();
    let Some(name) = pick_preset("Configure preset to clean:", "configure", names, preset)?
    else {
        return Ok(());
    };

    let build_dir = paths::resolve_binary_dir(&registry, &name, &workspace.root)?;
    if build_dir == workspace.root {
        bail!(
            "refusing to clean: binaryDir of '{name}' resolves to the project root itself"
        );
    }

    let cache_file = build_dir.join("CMakeCache.txt");
    if cache_file.exists() {
        match fs::remove_file(&cache_file) {
            Ok(()) => ui::note("Removed CMakeCache.txt"),
            Err(error) => ui::warn(format!("could not remove CMakeCache.txt: {error}")),
        }
    }

    if build_dir.is_dir() {
        // The clean target is more thorough where one exists; its failure
        // is tolerated because the directory is removed next anyway.
        let env = ExecEnv::capture();
        let args = vec![
            "--build".to_string(),
            build_dir.display().to_string(),
            "--target".to_string(),
            "clean".to_string(),
        ];
        let _ = runner::run_streamed(&workspace.config.tools.cmake, &args, &env, &workspace.root)?;
    }

    paths::clean_tree(&build_dir, "build directory")
}

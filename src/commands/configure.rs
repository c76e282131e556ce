use super::{load_workspace, pick_preset, run::run_tool};
use crate::inherit;
use crate::paths;
use crate::registry::PresetRegistry;
use crate::resolve;
use crate::ui;
use anyhow::{bail, Result};
use std::path::Path;

/// Configure a preset, resolving its build and install directories first.
/// The resolved install prefix is always passed explicitly so `cmake
/// --install` later lands where the operator was told it would.
pub fn configure(
    project_dir: Option<&Path>,
    preset: Option<String>,
    install_prefix: Option<String>,
    fresh: bool,
) -> Result<()> {
    let workspace = load_workspace(project_dir)?;
    let registry = PresetRegistry::build(&workspace.file);
    let names = resolve::visible_configure_presets(&workspace.file, &workspace.host)
        .iter()
        .map(|p| p.name.clone())
        .collect();
    let Some(name) = pick_preset("Configure preset:", "configure", names, preset)? else {
        return Ok(());
    };

    let build_dir = paths::resolve_binary_dir(&registry, &name, &workspace.root)?;
    let requested = match install_prefix {
        Some(prefix) => Some(prefix),
        None => prompt_install_dir(&registry, &name)?,
    };
    let install_dir =
        paths::resolve_install_dir(&registry, &name, &workspace.root, requested.as_deref())?;

    ui::note(format!("Build directory: {}", build_dir.display()));
    ui::note(format!("Install directory: {}", install_dir.display()));

    if fresh {
        paths::clean_tree(&build_dir, "build directory")?;
        paths::clean_tree(&install_dir, "install directory")?;
    }

    let cmake = workspace.config.tools.cmake.clone();
    run_tool(
        &workspace,
        &cmake,
        vec![
            "--preset".to_string(),
            name,
            format!("-DCMAKE_INSTALL_PREFIX={}", install_dir.display()),
        ],
    )
}

/// Install a configured preset's build output.
pub fn install(project_dir: Option<&Path>, preset: Option<String>) -> Result<()> {
    let workspace = load_workspace(project_dir)?;
    let registry = PresetRegistry::build(&workspace.file);
    let names = resolve::visible_configure_presets(&workspace.file, &workspace.host)
        .iter()
        .map(|p| p.name.clone())
        .collect();
    let Some(name) = pick_preset("Configure preset to install:", "configure", names, preset)?
    else {
        return Ok(());
    };

    let build_dir = paths::resolve_binary_dir(&registry, &name, &workspace.root)?;
    if !build_dir.is_dir() {
        bail!(
            "build directory {} does not exist; run `px configure` and `px build` first",
            build_dir.display()
        );
    }

    let mut args = vec!["--install".to_string(), build_dir.display().to_string()];
    // Single-config generators bake the build type in at configure time;
    // only multi-config ones need --config here.
    if let Some(build_type) = inherit::resolve_str(&registry, &name, "CMAKE_BUILD_TYPE") {
        let generator = inherit::resolve_str(&registry, &name, "generator").unwrap_or_default();
        let multi_config = generator.contains("Visual Studio")
            || generator.contains("Xcode")
            || generator.contains("Multi-Config");
        if multi_config {
            args.push("--config".to_string());
            args.push(build_type);
        }
    }

    let cmake = workspace.config.tools.cmake.clone();
    run_tool(&workspace, &cmake, args)
}

/// Ask for an install directory when the preset does not carry one.
/// Empty input or a cancel falls through to the resolver's error.
fn prompt_install_dir(
    registry: &PresetRegistry<'_>,
    preset_name: &str,
) -> Result<Option<String>> {
    if inherit::resolve(registry, preset_name, "CMAKE_INSTALL_PREFIX").is_some() {
        return Ok(None);
    }
    match inquire::Text::new("Install directory (relative to the project root):").prompt() {
        Ok(text) => {
            let text = text.trim().to_string();
            Ok(if text.is_empty() { None } else { Some(text) })
        }
        Err(
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted,
        ) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

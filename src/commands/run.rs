use super::{load_workspace, pick_preset, Workspace};
use crate::registry::PresetRegistry;
use crate::resolve::ActiveGraph;
use crate::runner::{self, ExecEnv};
use anyhow::{bail, Result};
use std::path::Path;

/// `cmake --build --preset <name> [--target <target>]`
pub fn build(
    project_dir: Option<&Path>,
    preset: Option<String>,
    target: Option<String>,
) -> Result<()> {
    let workspace = load_workspace(project_dir)?;
    let registry = PresetRegistry::build(&workspace.file);
    let active = ActiveGraph::resolve(&workspace.file, &registry, &workspace.host);
    let names = active.builds.iter().map(|p| p.name.clone()).collect();
    let Some(name) = pick_preset("Build preset:", "build", names, preset)? else {
        return Ok(());
    };

    let mut args = vec!["--build".to_string(), "--preset".to_string(), name];
    if let Some(target) = target {
        args.push("--target".to_string());
        args.push(target);
    }
    let cmake = workspace.config.tools.cmake.clone();
    run_tool(&workspace, &cmake, args)
}

/// `ctest --preset <name>`
pub fn test(project_dir: Option<&Path>, preset: Option<String>) -> Result<()> {
    let workspace = load_workspace(project_dir)?;
    let registry = PresetRegistry::build(&workspace.file);
    let active = ActiveGraph::resolve(&workspace.file, &registry, &workspace.host);
    let names = active.tests.iter().map(|p| p.name.clone()).collect();
    let Some(name) = pick_preset("Test preset:", "test", names, preset)? else {
        return Ok(());
    };

    let ctest = workspace.config.tools.ctest.clone();
    run_tool(
        &workspace,
        &ctest,
        vec!["--preset".to_string(), name],
    )
}

/// `cpack --preset <name>`
pub fn package(project_dir: Option<&Path>, preset: Option<String>) -> Result<()> {
    let workspace = load_workspace(project_dir)?;
    let registry = PresetRegistry::build(&workspace.file);
    let active = ActiveGraph::resolve(&workspace.file, &registry, &workspace.host);
    let names = active.packages.iter().map(|p| p.name.clone()).collect();
    let Some(name) = pick_preset("Package preset:", "package", names, preset)? else {
        return Ok(());
    };

    let cpack = workspace.config.tools.cpack.clone();
    run_tool(
        &workspace,
        &cpack,
        vec!["--preset".to_string(), name],
    )
}

/// `cmake --workflow --preset <name>`
pub fn workflow(project_dir: Option<&Path>, preset: Option<String>) -> Result<()> {
    let workspace = load_workspace(project_dir)?;
    let registry = PresetRegistry::build(&workspace.file);
    let active = ActiveGraph::resolve(&workspace.file, &registry, &workspace.host);
    let names = active.workflows.iter().map(|p| p.name.clone()).collect();
    let Some(name) = pick_preset("Workflow preset:", "workflow", names, preset)? else {
        return Ok(());
    };

    let cmake = workspace.config.tools.cmake.clone();
    run_tool(
        &workspace,
        &cmake,
        vec!["--workflow".to_string(), "--preset".to_string(), name],
    )
}

pub(crate) fn run_tool(workspace: &Workspace, program: &str, args: Vec<String>) -> Result<()> {
    let env = ExecEnv::capture();
    if runner::run_streamed(program, &args, &env, &workspace.root)? {
        Ok(())
    } else {
        bail!("{program} did not finish successfully")
    }
}

use super::load_workspace;
use crate::registry::PresetRegistry;
use crate::resolve::ActiveGraph;
use crate::ui::{self, Table};
use anyhow::Result;
use colored::*;
use std::path::Path;

/// Show every preset usable on the current host.
pub fn list(project_dir: Option<&Path>) -> Result<()> {
    let workspace = load_workspace(project_dir)?;
    let registry = PresetRegistry::build(&workspace.file);
    let active = ActiveGraph::resolve(&workspace.file, &registry, &workspace.host);

    let usable = active.configure.len()
        + active.builds.len()
        + active.tests.len()
        + active.packages.len()
        + active.workflows.len();
    println!(
        "{} {} of {} presets usable on {}",
        "⚙".cyan(),
        usable,
        workspace.file.preset_count(),
        workspace.host.bold()
    );

    if active.is_empty() {
        ui::warn(
            "nothing is usable on this host; check preset conditions and configurePreset references",
        );
        return Ok(());
    }

    let mut table = Table::new(&["Preset", "Kind", "Details"]);
    for preset in &active.configure {
        table.add_row(vec![
            preset.name.clone(),
            "configure".to_string(),
            preset.generator.clone().unwrap_or_default(),
        ]);
    }
    for preset in &active.builds {
        let details = if preset.targets.is_empty() {
            "default target".to_string()
        } else {
            preset.targets.join(", ")
        };
        table.add_row(vec![preset.name.clone(), "build".to_string(), details]);
    }
    for preset in &active.tests {
        table.add_row(vec![
            preset.name.clone(),
            "test".to_string(),
            preset.configure_preset.clone().unwrap_or_default(),
        ]);
    }
    for preset in &active.packages {
        table.add_row(vec![
            preset.name.clone(),
            "package".to_string(),
            preset.configure_preset.clone().unwrap_or_default(),
        ]);
    }
    for preset in &active.workflows {
        let steps: Vec<&str> = preset.steps.iter().map(|step| step.name.as_str()).collect();
        table.add_row(vec![
            preset.name.clone(),
            "workflow".to_string(),
            steps.join(", "),
        ]);
    }
    table.print();
    Ok(())
}

//! Per-host preset filtering and workflow activation.
//!
//! Resolution runs fresh on every invocation: the graph on disk and the
//! host identifier can both change between runs, so nothing is cached.
//! *Valid* means a preset's own condition holds for the host; *visible*
//! additionally requires it not be hidden. Hidden presets stay valid so
//! they remain usable as inheritance bases and indirect workflow targets.

use crate::condition;
use crate::model::{
    BuildPreset, ConfigurePreset, PackagePreset, PresetFile, StepKind, TestPreset, WorkflowPreset,
};
use crate::registry::{AnyPreset, PresetRegistry};
use crate::ui;
use std::collections::BTreeSet;

pub fn is_valid(preset: AnyPreset<'_>, host: &str) -> bool {
    condition::holds(preset.condition(), host)
}

pub fn is_visible(preset: AnyPreset<'_>, host: &str) -> bool {
    !preset.hidden() && is_valid(preset, host)
}

/// Names of every configure preset whose condition holds for `host`,
/// hidden or not.
pub fn valid_configure_names(file: &PresetFile, host: &str) -> BTreeSet<String> {
    file.configure_presets
        .iter()
        .filter(|preset| is_valid(AnyPreset::Configure(preset), host))
        .map(|preset| preset.name.clone())
        .collect()
}

/// Configure presets an operator may pick directly.
pub fn visible_configure_presets<'a>(
    file: &'a PresetFile,
    host: &str,
) -> Vec<&'a ConfigurePreset> {
    file.configure_presets
        .iter()
        .filter(|preset| is_visible(AnyPreset::Configure(preset), host))
        .collect()
}

/// The subset of a preset graph that is usable on one host.
pub struct ActiveGraph<'a> {
    pub host: String,
    pub valid_configure: BTreeSet<String>,
    pub configure: Vec<&'a ConfigurePreset>,
    pub builds: Vec<&'a BuildPreset>,
    pub tests: Vec<&'a TestPreset>,
    pub packages: Vec<&'a PackagePreset>,
    pub workflows: Vec<&'a WorkflowPreset>,
}

impl<'a> ActiveGraph<'a> {
    pub fn resolve(file: &'a PresetFile, registry: &PresetRegistry<'a>, host: &str) -> Self {
        let valid_configure = valid_configure_names(file, host);

        let builds = file
            .build_presets
            .iter()
            .filter(|preset| {
                dependent_is_active(AnyPreset::Build(preset), host, &valid_configure)
            })
            .collect();
        let tests = file
            .test_presets
            .iter()
            .filter(|preset| dependent_is_active(AnyPreset::Test(preset), host, &valid_configure))
            .collect();
        let packages = file
            .package_presets
            .iter()
            .filter(|preset| {
                dependent_is_active(AnyPreset::Package(preset), host, &valid_configure)
            })
            .collect();
        let workflows = file
            .workflow_presets
            .iter()
            .filter(|preset| workflow_is_active(preset, registry, host, &valid_configure))
            .collect();

        Self {
            host: host.to_string(),
            valid_configure,
            configure: visible_configure_presets(file, host),
            builds,
            tests,
            packages,
            workflows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.configure.is_empty()
            && self.builds.is_empty()
            && self.tests.is_empty()
            && self.packages.is_empty()
            && self.workflows.is_empty()
    }
}

/// A build/test/package preset is active when it is visible and its
/// configure reference names a preset valid on this host. A missing
/// reference is a graph defect: skip it, but say so.
fn dependent_is_active(
    preset: AnyPreset<'_>,
    host: &str,
    valid_configure: &BTreeSet<String>,
) -> bool {
    if !is_visible(preset, host) {
        return false;
    }
    match preset.configure_preset() {
        Some(reference) => valid_configure.contains(reference),
        None => {
            ui::warn(format!(
                "{} preset '{}' has no configurePreset reference, skipping",
                preset.kind().as_str(),
                preset.name()
            ));
            false
        }
    }
}

/// A workflow is active only if the workflow itself and every step it names
/// pass the same checks. Stops at the first failing step.
fn workflow_is_active(
    workflow: &WorkflowPreset,
    registry: &PresetRegistry<'_>,
    host: &str,
    valid_configure: &BTreeSet<String>,
) -> bool {
    if !is_visible(AnyPreset::Workflow(workflow), host) {
        return false;
    }
    for step in &workflow.steps {
        let Some(step_preset) = registry.get(&step.name) else {
            ui::warn(format!(
                "workflow '{}' references unknown preset '{}', skipping workflow",
                workflow.name, step.name
            ));
            return false;
        };
        if !is_visible(step_preset, host) {
            return false;
        }
        match step.kind {
            StepKind::Configure => {
                if !valid_configure.contains(&step.name) {
                    return false;
                }
            }
            StepKind::Build | StepKind::Test | StepKind::Package => {
                match step_preset.configure_preset() {
                    Some(reference) if valid_configure.contains(reference) => {}
                    _ => return false,
                }
            }
        }
    }
    true
}

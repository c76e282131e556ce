//! Name-keyed view over all presets of every kind.
//!
//! Preset names share one namespace across configure, build, test, package
//! and workflow presets, so a single map answers "what does this name refer
//! to" regardless of kind. Construction scans every collection once.

use crate::model::{
    BuildPreset, Condition, ConfigurePreset, PackagePreset, PresetFile, PresetKind, TestPreset,
    WorkflowPreset,
};
use crate::ui;
use std::collections::HashMap;

/// A borrowed preset of any kind.
#[derive(Debug, Clone, Copy)]
pub enum AnyPreset<'a> {
    Configure(&'a ConfigurePreset),
    Build(&'a BuildPreset),
    Test(&'a TestPreset),
    Package(&'a PackagePreset),
    Workflow(&'a WorkflowPreset),
}

impl<'a> AnyPreset<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Self::Configure(p) => &p.name,
            Self::Build(p) => &p.name,
            Self::Test(p) => &p.name,
            Self::Package(p) => &p.name,
            Self::Workflow(p) => &p.name,
        }
    }

    pub fn kind(&self) -> PresetKind {
        match self {
            Self::Configure(_) => PresetKind::Configure,
            Self::Build(_) => PresetKind::Build,
            Self::Test(_) => PresetKind::Test,
            Self::Package(_) => PresetKind::Package,
            Self::Workflow(_) => PresetKind::Workflow,
        }
    }

    pub fn hidden(&self) -> bool {
        match self {
            Self::Configure(p) => p.hidden,
            Self::Build(p) => p.hidden,
            Self::Test(p) => p.hidden,
            Self::Package(p) => p.hidden,
            Self::Workflow(p) => p.hidden,
        }
    }

    pub fn condition(&self) -> Option<&'a Condition> {
        match self {
            Self::Configure(p) => p.condition.as_ref(),
            Self::Build(p) => p.condition.as_ref(),
            Self::Test(p) => p.condition.as_ref(),
            Self::Package(p) => p.condition.as_ref(),
            Self::Workflow(p) => p.condition.as_ref(),
        }
    }

    /// The configure preset this one depends on. `None` for configure and
    /// workflow presets, which have no such reference.
    pub fn configure_preset(&self) -> Option<&'a str> {
        match self {
            Self::Configure(_) | Self::Workflow(_) => None,
            Self::Build(p) => p.configure_preset.as_deref(),
            Self::Test(p) => p.configure_preset.as_deref(),
            Self::Package(p) => p.configure_preset.as_deref(),
        }
    }
}

/// O(1) lookup by name over every preset in a graph.
pub struct PresetRegistry<'a> {
    by_name: HashMap<&'a str, AnyPreset<'a>>,
}

impl<'a> PresetRegistry<'a> {
    /// Index every preset of `file`. Duplicate names get a warning and the
    /// last occurrence wins, matching what CMake tolerates in practice.
    pub fn build(file: &'a PresetFile) -> Self {
        let mut by_name: HashMap<&'a str, AnyPreset<'a>> = HashMap::new();
        let mut insert = |preset: AnyPreset<'a>| {
            if let Some(previous) = by_name.insert(preset.name(), preset) {
                ui::warn(format!(
                    "duplicate preset name '{}' ({} shadows {})",
                    preset.name(),
                    preset.kind().as_str(),
                    previous.kind().as_str()
                ));
            }
        };
        for preset in &file.configure_presets {
            insert(AnyPreset::Configure(preset));
        }
        for preset in &file.build_presets {
            insert(AnyPreset::Build(preset));
        }
        for preset in &file.test_presets {
            insert(AnyPreset::Test(preset));
        }
        for preset in &file.package_presets {
            insert(AnyPreset::Package(preset));
        }
        for preset in &file.workflow_presets {
            insert(AnyPreset::Workflow(preset));
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<AnyPreset<'a>> {
        self.by_name.get(name).copied()
    }

    pub fn get_configure(&self, name: &str) -> Option<&'a ConfigurePreset> {
        match self.by_name.get(name) {
            Some(AnyPreset::Configure(preset)) => Some(preset),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildPreset, ConfigurePreset, PresetFile};

    fn sample_file() -> PresetFile {
        PresetFile {
            version: 6,
            configure_presets: vec![ConfigurePreset {
                name: "linux-debug".to_string(),
                ..Default::default()
            }],
            build_presets: vec![BuildPreset {
                name: "build-linux-debug".to_string(),
                configure_preset: Some("linux-debug".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn lookup_spans_all_kinds() {
        let file = sample_file();
        let registry = PresetRegistry::build(&file);
        assert_eq!(registry.len(), 2);
        assert!(matches!(
            registry.get("linux-debug"),
            Some(AnyPreset::Configure(_))
        ));
        assert!(matches!(
            registry.get("build-linux-debug"),
            Some(AnyPreset::Build(_))
        ));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn duplicate_names_keep_last_occurrence() {
        let mut file = sample_file();
        file.build_presets.push(BuildPreset {
            name: "linux-debug".to_string(),
            configure_preset: Some("linux-debug".to_string()),
            ..Default::default()
        });
        let registry = PresetRegistry::build(&file);
        assert!(matches!(
            registry.get("linux-debug"),
            Some(AnyPreset::Build(_))
        ));
        // Only typed lookups miss the shadowed entry.
        assert!(registry.get_configure("linux-debug").is_none());
    }

    #[test]
    fn configure_preset_reference_accessor() {
        let file = sample_file();
        let registry = PresetRegistry::build(&file);
        let build = registry.get("build-linux-debug").unwrap();
        assert_eq!(build.configure_preset(), Some("linux-debug"));
        let configure = registry.get("linux-debug").unwrap();
        assert_eq!(configure.configure_preset(), None);
    }
}

//! Preset graph data model.
//!
//! Mirrors the `CMakePresets.json` schema (version 6): a version header plus
//! five preset collections. Every preset kind is a struct with explicit
//! optional fields; fields prex does not interpret are captured in an
//! `extra` map so documents round-trip without loss.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Preset schema version emitted by the generator.
pub const PRESET_VERSION: u32 = 6;

/// The kinds a preset entry can have. One shared namespace covers them all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Configure,
    Build,
    Test,
    Package,
    Workflow,
}

impl PresetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Test => "test",
            Self::Package => "package",
            Self::Workflow => "workflow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CMakeMinimumRequired {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// A preset condition: absent (always holds), a boolean literal, a
/// structured clause, or anything else (conservatively never holds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Literal(bool),
    Clause(ConditionClause),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionClause {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lhs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rhs: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Condition {
    /// An `equals`/`notEquals` clause against `${hostSystemName}`.
    pub fn host_equals(os_name: &str) -> Self {
        Self::Clause(ConditionClause {
            kind: "equals".to_string(),
            lhs: Some(crate::condition::HOST_SYSTEM_NAME.to_string()),
            rhs: Some(os_name.to_string()),
            extra: BTreeMap::new(),
        })
    }
}

/// `inherits` accepts a single parent name or an ordered list of names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inherits {
    One(String),
    Many(Vec<String>),
}

impl Inherits {
    pub fn names(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurePreset {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<Inherits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_dir: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cache_variables: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPreset {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configure_preset: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPreset {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<Inherits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configure_preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<TestOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<TestExecution>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_on_failure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestExecution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub launcher: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagePreset {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configure_preset: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Configure,
    Build,
    Test,
    Package,
}

impl StepKind {
    pub fn as_preset_kind(&self) -> PresetKind {
        match self {
            Self::Configure => PresetKind::Configure,
            Self::Build => PresetKind::Build,
            Self::Test => PresetKind::Test,
            Self::Package => PresetKind::Package,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPreset {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The whole persisted preset graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetFile {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmake_minimum_required: Option<CMakeMinimumRequired>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configure_presets: Vec<ConfigurePreset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build_presets: Vec<BuildPreset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_presets: Vec<TestPreset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_presets: Vec<PackagePreset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workflow_presets: Vec<WorkflowPreset>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PresetFile {
    /// Load a preset graph. Missing or unparsable files are fatal: nothing
    /// downstream can work without the graph.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {} (run `px generate` first?)", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a valid preset file", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut rendered = serde_json::to_string_pretty(self)?;
        rendered.push('\n');
        fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn preset_count(&self) -> usize {
        self.configure_presets.len()
            + self.build_presets.len()
            + self.test_presets.len()
            + self.package_presets.len()
            + self.workflow_presets.len()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

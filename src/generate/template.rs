//! Preset template parsing.
//!
//! A template is a compact JSON document with two sections: `platform`
//! (one spec per supported OS) and `workflows` (named groups of steps).
//! Both are transient generation inputs; they never appear in the emitted
//! preset graph.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFile {
    #[serde(default)]
    pub platform: Vec<PlatformSpec>,
    #[serde(default)]
    pub workflows: Vec<WorkflowGroup>,
}

/// A named group of workflow steps, e.g. `{"Flow": [ ...steps ]}`.
pub type WorkflowGroup = BTreeMap<String, Vec<StepSpec>>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformSpec {
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub generator: Option<String>,
    #[serde(default, rename = "CMAKE_CXX_STANDARD")]
    pub cxx_standard: Option<Value>,
    #[serde(default, rename = "C_COMPILER")]
    pub c_compiler: Option<String>,
    #[serde(default, rename = "CXX_COMPILER")]
    pub cxx_compiler: Option<String>,
    #[serde(default, rename = "LINK")]
    pub linker: Option<String>,
    #[serde(default, rename = "RC")]
    pub rc_compiler: Option<String>,
    #[serde(default, rename = "MT")]
    pub mt_compiler: Option<String>,
    #[serde(default)]
    pub toolchain: Option<String>,
    #[serde(default)]
    pub triplet: Option<String>,
    #[serde(default)]
    pub debug_flag: FlagSet,
    #[serde(default)]
    pub rel_flag: FlagSet,
    #[serde(default, rename = "envPath")]
    pub env_path: Vec<String>,
    #[serde(default, rename = "linuxEnvPath")]
    pub linux_env_path: Vec<String>,
    #[serde(default, rename = "macEnvPath")]
    pub mac_env_path: Vec<String>,
}

impl PlatformSpec {
    /// The PATH entries for this platform, with the separator they must be
    /// joined with. Each OS keeps its own template field.
    pub fn env_paths(&self) -> (&[String], &'static str) {
        match self.os.as_deref() {
            Some("Windows") => (self.env_path.as_slice(), ";"),
            Some("Linux") => (self.linux_env_path.as_slice(), ":"),
            Some("Darwin") => (self.mac_env_path.as_slice(), ":"),
            _ => (&[], ":"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlagSet {
    #[serde(default, rename = "CMAKE_CXX_FLAGS")]
    pub cxx_flags: Option<String>,
    #[serde(default, rename = "CMAKE_C_FLAGS")]
    pub c_flags: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepSpecKind {
    Configure,
    Build,
    Test,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: StepSpecKind,
    #[serde(default)]
    pub target: Option<String>,
    /// Option flags gating this step. All of them must resolve ON for the
    /// step to run; they also feed the base preset's cache variables.
    #[serde(default)]
    pub option: BTreeMap<String, Value>,
    #[serde(default)]
    pub args: StepArgs,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepArgs {
    #[serde(default)]
    pub apply_to_build_types: Option<Vec<String>>,
    #[serde(default)]
    pub use_launcher: bool,
    #[serde(default)]
    pub launcher_command: Vec<String>,
    #[serde(default)]
    pub launcher_test_preset_suffix: Option<String>,
}

impl StepSpec {
    /// A step runs only when every option it names resolves ON. A step
    /// without options always runs.
    pub fn enabled(&self) -> bool {
        self.option.values().all(cmake_bool)
    }

    /// Test steps default to applying to every build type.
    pub fn applies_to(&self, build_type: &str) -> bool {
        match &self.args.apply_to_build_types {
            Some(types) => types.iter().any(|entry| entry == build_type),
            None => true,
        }
    }
}

impl TemplateFile {
    /// A missing or unparsable template is fatal: there is nothing to
    /// generate from.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("template {} is not valid JSON", path.display()))
    }

    /// Every step across every workflow group, in document order.
    pub fn all_steps(&self) -> impl Iterator<Item = (&str, &StepSpec)> {
        self.workflows.iter().flat_map(|group| {
            group
                .iter()
                .flat_map(|(name, steps)| steps.iter().map(move |step| (name.as_str(), step)))
        })
    }
}

/// Interpret a template option value the way CMake cache booleans read:
/// `true`, `1` and the string `ON` (any case) are ON, everything else OFF.
pub fn cmake_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_i64() == Some(1),
        Value::String(text) => text.eq_ignore_ascii_case("ON"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cmake_bool_accepts_the_usual_spellings() {
        assert!(cmake_bool(&json!(true)));
        assert!(cmake_bool(&json!(1)));
        assert!(cmake_bool(&json!("ON")));
        assert!(cmake_bool(&json!("on")));
        assert!(!cmake_bool(&json!(false)));
        assert!(!cmake_bool(&json!(0)));
        assert!(!cmake_bool(&json!("OFF")));
        assert!(!cmake_bool(&json!("yes")));
        assert!(!cmake_bool(&json!(null)));
    }

    #[test]
    fn step_without_options_is_enabled() {
        let step: StepSpec = serde_json::from_value(json!({"type": "test"})).unwrap();
        assert!(step.enabled());
        assert!(step.applies_to("debug"));
        assert!(step.applies_to("release"));
    }

    #[test]
    fn step_with_off_option_is_disabled() {
        let step: StepSpec = serde_json::from_value(json!({
            "type": "build",
            "target": "clang-tidy",
            "option": {"ENABLE_CLANG_TIDY": false}
        }))
        .unwrap();
        assert!(!step.enabled());
    }

    #[test]
    fn apply_to_build_types_restricts_tests() {
        let step: StepSpec = serde_json::from_value(json!({
            "type": "test",
            "args": {"apply_to_build_types": ["debug"]}
        }))
        .unwrap();
        assert!(step.applies_to("debug"));
        assert!(!step.applies_to("release"));
    }

    #[test]
    fn template_sections_default_to_empty() {
        let template: TemplateFile = serde_json::from_str("{}").unwrap();
        assert!(template.platform.is_empty());
        assert!(template.workflows.is_empty());
        assert_eq!(template.all_steps().count(), 0);
    }

    #[test]
    fn env_paths_pick_the_platform_field() {
        let spec: PlatformSpec = serde_json::from_value(json!({
            "os": "Windows",
            "envPath": ["C:/tools", "C:/cmake/bin"],
            "linuxEnvPath": ["/usr/bin"]
        }))
        .unwrap();
        let (paths, separator) = spec.env_paths();
        assert_eq!(paths, ["C:/tools", "C:/cmake/bin"]);
        assert_eq!(separator, ";");
    }
}

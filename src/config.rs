use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Optional tool configuration (`px.toml` at the project root).
#[derive(Deserialize, Debug, Default)]
pub struct PxConfig {
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Deserialize, Debug)]
pub struct TemplateConfig {
    /// Template consumed by `px generate`.
    #[serde(default = "default_template_path")]
    pub path: String,
    /// Preset graph written by `px generate` and read by every other command.
    #[serde(default = "default_output_name")]
    pub output: String,
}

#[derive(Deserialize, Debug)]
pub struct ToolsConfig {
    #[serde(default = "default_cmake")]
    pub cmake: String,
    #[serde(default = "default_ctest")]
    pub ctest: String,
    #[serde(default = "default_cpack")]
    pub cpack: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: default_template_path(),
            output: default_output_name(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            cmake: default_cmake(),
            ctest: default_ctest(),
            cpack: default_cpack(),
        }
    }
}

fn default_template_path() -> String {
    "preset-template.json".to_string()
}

fn default_output_name() -> String {
    "CMakePresets.json".to_string()
}

fn default_cmake() -> String {
    "cmake".to_string()
}

fn default_ctest() -> String {
    "ctest".to_string()
}

fn default_cpack() -> String {
    "cpack".to_string()
}

/// Load `px.toml` from the project root. A missing file means defaults; a
/// present but broken file is a configuration error worth stopping for.
pub fn load_config(root: &Path) -> Result<PxConfig> {
    let path = root.join("px.toml");
    if !path.exists() {
        return Ok(PxConfig::default());
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("{} is not valid TOML", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let temp = tempfile::tempdir().unwrap();
        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.template.output, "CMakePresets.json");
        assert_eq!(config.tools.cmake, "cmake");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join("px.toml"),
            "[template]\npath = \".project/template.json\"\n",
        )
        .unwrap();
        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.template.path, ".project/template.json");
        assert_eq!(config.template.output, "CMakePresets.json");
        assert_eq!(config.tools.ctest, "ctest");
    }

    #[test]
    fn broken_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("px.toml"), "template = [").unwrap();
        assert!(load_config(temp.path()).is_err());
    }
}

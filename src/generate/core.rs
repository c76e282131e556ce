//! Preset graph generation.
//!
//! Expands a platform × build-type × workflow template into a concrete
//! graph of named presets. Per platform: one hidden base configure preset
//! carrying the toolchain and the union of every option flag any workflow
//! step references, one concrete configure preset per build type bound to
//! the platform's OS, build presets for the main project and each gated
//! target, test presets (plus launcher-wrapped variants), and one workflow
//! preset per template group and build type.
//!
//! Generation is pure and deterministic: the same template always yields
//! the same names and cross-references.

use super::template::{cmake_bool, PlatformSpec, StepSpec, StepSpecKind, TemplateFile};
use crate::model::{
    BuildPreset, CMakeMinimumRequired, Condition, ConfigurePreset, Inherits, PresetFile,
    StepKind, TestExecution, TestOutput, TestPreset, WorkflowPreset, WorkflowStep, PRESET_VERSION,
};
use crate::ui;
use anyhow::{bail, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

const CMAKE_MIN_MAJOR: u32 = 3;
const CMAKE_MIN_MINOR: u32 = 25;
const CMAKE_MIN_PATCH: u32 = 0;
const BINARY_DIR: &str = "${sourceDir}/build";
const RUNTIME_OUTPUT_DIR: &str = "${sourceDir}/build/bin";
const DEFAULT_BUILD_JOBS: u32 = 8;
const DEFAULT_TEST_TIMEOUT: u32 = 300;
const LAUNCHER_TIMEOUT_MULTIPLIER: u32 = 5;
const DEFAULT_LAUNCHER_SUFFIX: &str = "-launcher";
const BUILD_TYPES: [&str; 2] = ["debug", "release"];

/// The name prefix used for every preset of a platform.
pub fn os_slug(os: &str) -> String {
    match os {
        "Darwin" => "mac".to_string(),
        "Windows" => "windows".to_string(),
        "Linux" => "linux".to_string(),
        other => sanitize_name(other),
    }
}

/// Human-facing OS name for display strings.
pub fn display_os_name(os: &str) -> &str {
    if os == "Darwin" { "macOS" } else { os }
}

/// Lower-case a name and fold spaces/underscores to hyphens so it can be
/// embedded in a preset name.
pub fn sanitize_name(name: &str) -> String {
    name.to_lowercase().replace([' ', '_'], "-")
}

fn capitalize(build_type: &str) -> String {
    let mut chars = build_type.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn insert_string(cache: &mut BTreeMap<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        if !value.is_empty() {
            cache.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
}

struct PlatformCtx<'a> {
    spec: &'a PlatformSpec,
    os: &'a str,
    slug: String,
    display: &'a str,
}

/// Synthesizes a complete preset graph from a template.
pub struct Generator<'a> {
    template: &'a TemplateFile,
    platforms: Vec<PlatformCtx<'a>>,
    /// Union of every option flag any step references; a flag is ON if at
    /// least one step anywhere requests it ON.
    option_flags: BTreeMap<String, bool>,
}

impl<'a> Generator<'a> {
    pub fn new(template: &'a TemplateFile) -> Self {
        let platforms = template
            .platform
            .iter()
            .filter_map(|spec| match spec.os.as_deref() {
                Some(os) => Some(PlatformCtx {
                    spec,
                    os,
                    slug: os_slug(os),
                    display: display_os_name(os),
                }),
                None => {
                    ui::warn("skipping platform spec without an 'os' field");
                    None
                }
            })
            .collect();

        let mut option_flags: BTreeMap<String, bool> = BTreeMap::new();
        for (_, step) in template.all_steps() {
            for (name, value) in &step.option {
                let on = cmake_bool(value);
                let entry = option_flags.entry(name.clone()).or_insert(false);
                *entry = *entry || on;
            }
        }

        Self {
            template,
            platforms,
            option_flags,
        }
    }

    pub fn generate(&self) -> Result<PresetFile> {
        let mut file = PresetFile {
            version: PRESET_VERSION,
            cmake_minimum_required: Some(CMakeMinimumRequired {
                major: CMAKE_MIN_MAJOR,
                minor: CMAKE_MIN_MINOR,
                patch: CMAKE_MIN_PATCH,
            }),
            ..Default::default()
        };
        self.add_configure_presets(&mut file);
        self.add_build_presets(&mut file);
        // Test presets must exist before the workflows that reference them.
        self.add_test_presets(&mut file);
        self.add_workflow_presets(&mut file);
        ensure_unique_names(&file)?;
        Ok(file)
    }

    fn add_configure_presets(&self, file: &mut PresetFile) {
        for platform in &self.platforms {
            let spec = platform.spec;
            let base_name = format!("{}-base", platform.slug);

            let mut cache: BTreeMap<String, Value> = BTreeMap::new();
            insert_string(&mut cache, "CMAKE_C_COMPILER", spec.c_compiler.as_deref());
            insert_string(&mut cache, "CMAKE_CXX_COMPILER", spec.cxx_compiler.as_deref());
            if let Some(standard) = &spec.cxx_standard {
                let standard = match standard {
                    Value::String(text) => text.clone(),
                    Value::Number(number) => number.to_string(),
                    _ => String::new(),
                };
                insert_string(&mut cache, "CMAKE_CXX_STANDARD", Some(standard.as_str()));
            }
            insert_string(&mut cache, "CMAKE_TOOLCHAIN_FILE", spec.toolchain.as_deref());
            insert_string(&mut cache, "VCPKG_TARGET_TRIPLET", spec.triplet.as_deref());
            if platform.os == "Windows" {
                insert_string(&mut cache, "CMAKE_LINKER", spec.linker.as_deref());
                insert_string(&mut cache, "CMAKE_RC_COMPILER", spec.rc_compiler.as_deref());
                insert_string(&mut cache, "CMAKE_MT", spec.mt_compiler.as_deref());
            }
            for (flag, on) in &self.option_flags {
                cache.insert(
                    flag.clone(),
                    Value::String(if *on { "ON" } else { "OFF" }.to_string()),
                );
            }

            let mut environment = BTreeMap::new();
            let (paths, separator) = spec.env_paths();
            let joined = paths
                .iter()
                .filter(|entry| !entry.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(separator);
            if !joined.is_empty() {
                environment.insert("PATH".to_string(), joined);
            }

            file.configure_presets.push(ConfigurePreset {
                name: base_name.clone(),
                hidden: true,
                display_name: Some(format!("{} Base", platform.display)),
                description: spec
                    .description
                    .clone()
                    .or_else(|| Some(format!("Base configuration for {}", platform.display))),
                generator: Some(spec.generator.clone().unwrap_or_else(|| "Ninja".to_string())),
                binary_dir: Some(BINARY_DIR.to_string()),
                cache_variables: cache,
                environment,
                ..Default::default()
            });

            for build_type in BUILD_TYPES {
                let flags = if build_type == "debug" {
                    &spec.debug_flag
                } else {
                    &spec.rel_flag
                };
                let mut cache: BTreeMap<String, Value> = BTreeMap::new();
                cache.insert(
                    "CMAKE_BUILD_TYPE".to_string(),
                    Value::String(capitalize(build_type)),
                );
                insert_string(&mut cache, "CMAKE_CXX_FLAGS", flags.cxx_flags.as_deref());
                insert_string(&mut cache, "CMAKE_C_FLAGS", flags.c_flags.as_deref());
                cache.insert(
                    "CMAKE_RUNTIME_OUTPUT_DIRECTORY".to_string(),
                    Value::String(RUNTIME_OUTPUT_DIR.to_string()),
                );
                file.configure_presets.push(ConfigurePreset {
                    name: format!("{}-{build_type}", platform.slug),
                    display_name: Some(format!("{} {}", platform.display, capitalize(build_type))),
                    inherits: Some(Inherits::One(base_name.clone())),
                    condition: Some(Condition::host_equals(platform.os)),
                    cache_variables: cache,
                    ..Default::default()
                });
            }
        }
    }

    /// Build targets requested by any workflow step, and whether any step
    /// requesting the target has all of its gating options ON. A target
    /// gated OFF everywhere is not generated at all.
    fn gated_build_targets(&self) -> BTreeMap<&'a str, bool> {
        let mut targets: BTreeMap<&'a str, bool> = BTreeMap::new();
        for (group, step) in self.template.all_steps() {
            if step.kind != StepSpecKind::Build {
                continue;
            }
            match step.target.as_deref() {
                Some(target) => {
                    let entry = targets.entry(target).or_insert(false);
                    *entry = *entry || step.enabled();
                }
                None => ui::warn(format!(
                    "build step '{}' in workflow '{group}' has no target, skipping",
                    step.description.as_deref().unwrap_or("unnamed")
                )),
            }
        }
        targets
    }

    fn add_build_presets(&self, file: &mut PresetFile) {
        let targets = self.gated_build_targets();
        for platform in &self.platforms {
            for build_type in BUILD_TYPES {
                let configure_ref = format!("{}-{build_type}", platform.slug);
                file.build_presets.push(BuildPreset {
                    name: format!("build-{configure_ref}"),
                    configure_preset: Some(configure_ref.clone()),
                    jobs: Some(DEFAULT_BUILD_JOBS),
                    display_name: Some(format!(
                        "Build project ({} {})",
                        platform.display,
                        capitalize(build_type)
                    )),
                    ..Default::default()
                });
                for (target, enabled) in &targets {
                    if !enabled {
                        continue;
                    }
                    file.build_presets.push(BuildPreset {
                        name: format!("build-{configure_ref}-{}", sanitize_name(target)),
                        targets: vec![target.to_string()],
                        configure_preset: Some(configure_ref.clone()),
                        display_name: Some(format!(
                            "Build target '{target}' ({} {})",
                            platform.display,
                            capitalize(build_type)
                        )),
                        ..Default::default()
                    });
                }
            }
        }
    }

    fn add_test_presets(&self, file: &mut PresetFile) {
        let test_steps: Vec<&StepSpec> = self
            .template
            .all_steps()
            .filter(|(_, step)| step.kind == StepSpecKind::Test)
            .map(|(_, step)| step)
            .collect();
        if test_steps.is_empty() {
            return;
        }

        for platform in &self.platforms {
            for build_type in BUILD_TYPES {
                if !test_steps.iter().any(|step| step.applies_to(build_type)) {
                    continue;
                }
                let configure_ref = format!("{}-{build_type}", platform.slug);
                let base_name = format!("{configure_ref}-tests");
                file.test_presets.push(TestPreset {
                    name: base_name.clone(),
                    display_name: Some(format!(
                        "Run tests ({} {})",
                        platform.display,
                        capitalize(build_type)
                    )),
                    configure_preset: Some(configure_ref.clone()),
                    configuration: Some(capitalize(build_type)),
                    output: Some(TestOutput {
                        output_on_failure: Some(true),
                        verbosity: Some("default".to_string()),
                        ..Default::default()
                    }),
                    execution: Some(TestExecution {
                        jobs: Some(1),
                        timeout: Some(DEFAULT_TEST_TIMEOUT),
                        ..Default::default()
                    }),
                    ..Default::default()
                });

                for step in &test_steps {
                    if !step.args.use_launcher || !step.applies_to(build_type) {
                        continue;
                    }
                    if step.args.launcher_command.is_empty() {
                        ui::warn(format!(
                            "test step '{}' requests a launcher but gives no launcher_command, skipping",
                            step.description.as_deref().unwrap_or("unnamed")
                        ));
                        continue;
                    }
                    let suffix = step
                        .args
                        .launcher_test_preset_suffix
                        .as_deref()
                        .unwrap_or(DEFAULT_LAUNCHER_SUFFIX);
                    let name = format!("{base_name}{suffix}");
                    if file.test_presets.iter().any(|preset| preset.name == name) {
                        continue;
                    }
                    file.test_presets.push(TestPreset {
                        name,
                        display_name: Some(format!(
                            "Run tests ({}, {} {})",
                            step.args.launcher_command[0],
                            platform.display,
                            capitalize(build_type)
                        )),
                        configure_preset: Some(configure_ref.clone()),
                        // Inherits output settings from the base; the
                        // launcher forces serial runs and a longer budget.
                        inherits: Some(Inherits::Many(vec![base_name.clone()])),
                        execution: Some(TestExecution {
                            jobs: Some(1),
                            timeout: Some(DEFAULT_TEST_TIMEOUT * LAUNCHER_TIMEOUT_MULTIPLIER),
                            launcher: step.args.launcher_command.clone(),
                            ..Default::default()
                        }),
                        ..Default::default()
                    });
                }
            }
        }
    }

    fn add_workflow_presets(&self, file: &mut PresetFile) {
        for platform in &self.platforms {
            for build_type in BUILD_TYPES {
                let configure_ref = format!("{}-{build_type}", platform.slug);
                let main_build = format!("build-{configure_ref}");

                for group in &self.template.workflows {
                    for (group_name, steps) in group {
                        let name = format!(
                            "{configure_ref}-workflow-{}",
                            sanitize_name(group_name)
                        );
                        let mut workflow_steps = vec![WorkflowStep {
                            kind: StepKind::Configure,
                            name: configure_ref.clone(),
                        }];

                        // Gated pre-build steps, in template order.
                        for step in steps {
                            if step.kind != StepSpecKind::Build || !step.enabled() {
                                continue;
                            }
                            let Some(target) = step.target.as_deref() else {
                                continue;
                            };
                            let preset_name =
                                format!("build-{configure_ref}-{}", sanitize_name(target));
                            if file.build_presets.iter().any(|p| p.name == preset_name) {
                                workflow_steps.push(WorkflowStep {
                                    kind: StepKind::Build,
                                    name: preset_name,
                                });
                            } else {
                                ui::warn(format!(
                                    "workflow '{name}' skips target '{target}': no build preset was generated for it"
                                ));
                            }
                        }

                        workflow_steps.push(WorkflowStep {
                            kind: StepKind::Build,
                            name: main_build.clone(),
                        });

                        for step in steps {
                            if step.kind != StepSpecKind::Test
                                || !step.enabled()
                                || !step.applies_to(build_type)
                            {
                                continue;
                            }
                            let mut preset_name = format!("{configure_ref}-tests");
                            if step.args.use_launcher {
                                preset_name.push_str(
                                    step.args
                                        .launcher_test_preset_suffix
                                        .as_deref()
                                        .unwrap_or(DEFAULT_LAUNCHER_SUFFIX),
                                );
                            }
                            if file.test_presets.iter().any(|p| p.name == preset_name) {
                                workflow_steps.push(WorkflowStep {
                                    kind: StepKind::Test,
                                    name: preset_name,
                                });
                            } else {
                                ui::warn(format!(
                                    "workflow '{name}' skips a test step: test preset '{preset_name}' was not generated"
                                ));
                            }
                        }

                        // A workflow that would only configure is useless.
                        let has_action = workflow_steps
                            .iter()
                            .any(|step| step.kind != StepKind::Configure);
                        if has_action {
                            file.workflow_presets.push(WorkflowPreset {
                                name,
                                display_name: Some(format!(
                                    "Workflow: {group_name} ({} {})",
                                    platform.display,
                                    capitalize(build_type)
                                )),
                                steps: workflow_steps,
                                ..Default::default()
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Preset names share one namespace; a collision is a generation defect.
fn ensure_unique_names(file: &PresetFile) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    let names = file
        .configure_presets
        .iter()
        .map(|p| p.name.as_str())
        .chain(file.build_presets.iter().map(|p| p.name.as_str()))
        .chain(file.test_presets.iter().map(|p| p.name.as_str()))
        .chain(file.package_presets.iter().map(|p| p.name.as_str()))
        .chain(file.workflow_presets.iter().map(|p| p.name.as_str()));
    for name in names {
        if !seen.insert(name) {
            bail!("generated duplicate preset name '{name}' (check the template for repeated platforms or groups)");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(value: serde_json::Value) -> TemplateFile {
        serde_json::from_value(value).unwrap()
    }

    fn linux_test_template() -> TemplateFile {
        template(json!({
            "platform": [{
                "os": "Linux",
                "generator": "Ninja",
                "C_COMPILER": "/usr/bin/clang",
                "CXX_COMPILER": "/usr/bin/clang++",
                "CMAKE_CXX_STANDARD": "20",
                "toolchain": "/opt/vcpkg/scripts/buildsystems/vcpkg.cmake",
                "triplet": "x64-linux-llvm",
                "debug_flag": {"CMAKE_CXX_FLAGS": "-g -O0", "CMAKE_C_FLAGS": "-g -O0"},
                "rel_flag": {"CMAKE_CXX_FLAGS": "-O2 -DNDEBUG"}
            }],
            "workflows": [{
                "Flow": [{
                    "type": "test",
                    "option": {"BUILD_TESTS": true},
                    "args": {"apply_to_build_types": ["debug", "release"]}
                }]
            }]
        }))
    }

    #[test]
    fn single_platform_template_expands_fully() {
        let template = linux_test_template();
        let file = Generator::new(&template).generate().unwrap();

        let configure: Vec<_> = file
            .configure_presets
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(configure, ["linux-base", "linux-debug", "linux-release"]);
        assert!(file.configure_presets[0].hidden);

        let tests: Vec<_> = file.test_presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(tests, ["linux-debug-tests", "linux-release-tests"]);

        assert_eq!(file.workflow_presets.len(), 2);
        for workflow in &file.workflow_presets {
            let kinds: Vec<_> = workflow.steps.iter().map(|s| s.kind).collect();
            assert_eq!(kinds, [StepKind::Configure, StepKind::Build, StepKind::Test]);
        }
    }

    #[test]
    fn base_preset_carries_union_of_option_flags() {
        let template = template(json!({
            "platform": [{"os": "Linux"}],
            "workflows": [{
                "Flow": [
                    {"type": "build", "target": "lint", "option": {"ENABLE_LINT": true}},
                    {"type": "test", "option": {"BUILD_TESTS": false}}
                ]
            }, {
                "Extra": [
                    {"type": "test", "option": {"BUILD_TESTS": true}}
                ]
            }]
        }));
        let file = Generator::new(&template).generate().unwrap();
        let base = &file.configure_presets[0];
        assert_eq!(base.cache_variables["ENABLE_LINT"], json!("ON"));
        // Any-ON wins across groups.
        assert_eq!(base.cache_variables["BUILD_TESTS"], json!("ON"));
    }

    #[test]
    fn target_gated_off_everywhere_is_not_generated() {
        let template = template(json!({
            "platform": [{"os": "Linux"}],
            "workflows": [{
                "Flow": [
                    {"type": "build", "target": "tidy_export", "option": {"ENABLE_X": false}},
                    {"type": "test", "option": {"BUILD_TESTS": true}}
                ]
            }]
        }));
        let file = Generator::new(&template).generate().unwrap();
        assert!(
            !file
                .build_presets
                .iter()
                .any(|p| p.name.contains("tidy-export")),
            "disabled target must not produce a build preset"
        );
        for workflow in &file.workflow_presets {
            assert!(workflow.steps.iter().all(|s| !s.name.contains("tidy-export")));
        }
    }

    #[test]
    fn target_names_are_sanitized() {
        let template = template(json!({
            "platform": [{"os": "Linux"}],
            "workflows": [{
                "Flow": [
                    {"type": "build", "target": "Clang Format_All", "option": {"ENABLE_FMT": true}}
                ]
            }]
        }));
        let file = Generator::new(&template).generate().unwrap();
        assert!(file
            .build_presets
            .iter()
            .any(|p| p.name == "build-linux-debug-clang-format-all"));
    }

    #[test]
    fn launcher_step_gets_a_wrapped_test_preset() {
        let template = template(json!({
            "platform": [{"os": "Linux"}],
            "workflows": [{
                "Flow": [{
                    "type": "test",
                    "option": {"BUILD_TESTS": true},
                    "args": {
                        "apply_to_build_types": ["debug"],
                        "use_launcher": true,
                        "launcher_command": ["valgrind", "--leak-check=full"],
                        "launcher_test_preset_suffix": "-valgrind"
                    }
                }]
            }]
        }));
        let file = Generator::new(&template).generate().unwrap();
        let wrapped = file
            .test_presets
            .iter()
            .find(|p| p.name == "linux-debug-tests-valgrind")
            .expect("launcher variant generated");
        let execution = wrapped.execution.as_ref().unwrap();
        assert_eq!(execution.launcher, ["valgrind", "--leak-check=full"]);
        assert_eq!(execution.jobs, Some(1));
        assert_eq!(
            execution.timeout,
            Some(DEFAULT_TEST_TIMEOUT * LAUNCHER_TIMEOUT_MULTIPLIER)
        );
        assert_eq!(
            wrapped.inherits,
            Some(Inherits::Many(vec!["linux-debug-tests".to_string()]))
        );
        // Debug workflow references the wrapped preset, release has no test step.
        let debug_flow = file
            .workflow_presets
            .iter()
            .find(|w| w.name == "linux-debug-workflow-flow")
            .unwrap();
        assert!(debug_flow
            .steps
            .iter()
            .any(|s| s.name == "linux-debug-tests-valgrind"));
        let release_flow = file
            .workflow_presets
            .iter()
            .find(|w| w.name == "linux-release-workflow-flow")
            .unwrap();
        assert!(release_flow.steps.iter().all(|s| s.kind != StepKind::Test));
    }

    #[test]
    fn generation_is_idempotent() {
        let template = linux_test_template();
        let first = Generator::new(&template).generate().unwrap();
        let second = Generator::new(&template).generate().unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn duplicate_platform_is_a_generation_defect() {
        let template = template(json!({
            "platform": [{"os": "Linux"}, {"os": "Linux"}],
            "workflows": []
        }));
        assert!(Generator::new(&template).generate().is_err());
    }

    #[test]
    fn windows_base_carries_extra_tool_variables() {
        let template = template(json!({
            "platform": [{
                "os": "Windows",
                "C_COMPILER": "clang-cl",
                "CXX_COMPILER": "clang-cl",
                "LINK": "lld-link",
                "RC": "rc",
                "MT": "mt",
                "envPath": ["C:/tools", "C:/cmake/bin"]
            }],
            "workflows": []
        }));
        let file = Generator::new(&template).generate().unwrap();
        let base = &file.configure_presets[0];
        assert_eq!(base.name, "windows-base");
        assert_eq!(base.cache_variables["CMAKE_LINKER"], json!("lld-link"));
        assert_eq!(base.cache_variables["CMAKE_RC_COMPILER"], json!("rc"));
        assert_eq!(base.cache_variables["CMAKE_MT"], json!("mt"));
        assert_eq!(base.environment["PATH"], "C:/tools;C:/cmake/bin");
    }

    #[test]
    fn unknown_os_gets_a_sanitized_slug() {
        assert_eq!(os_slug("Darwin"), "mac");
        assert_eq!(os_slug("FreeBSD"), "freebsd");
        assert_eq!(os_slug("My OS"), "my-os");
    }
}

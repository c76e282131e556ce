use crate::config;
use crate::generate::{Generator, TemplateFile};
use crate::paths;
use crate::ui;
use anyhow::Result;
use std::path::Path;

/// Expand the preset template into `CMakePresets.json`.
pub fn generate(
    project_dir: Option<&Path>,
    template: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let root = paths::project_root(project_dir)?;
    let config = config::load_config(&root)?;
    let template_path = template
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(&config.template.path));
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(&config.template.output));

    let template = TemplateFile::load(&template_path)?;
    let file = Generator::new(&template).generate()?;
    file.save(&output_path)?;

    ui::status(format!(
        "Wrote {} ({} configure, {} build, {} test, {} workflow presets)",
        output_path.display(),
        file.configure_presets.len(),
        file.build_presets.len(),
        file.test_presets.len(),
        file.workflow_presets.len()
    ));
    Ok(())
}

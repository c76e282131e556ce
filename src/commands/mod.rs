//! CLI command handlers
//!
//! One module per `px` subcommand, plus the shared workspace loading and
//! preset-selection helpers they all use.

pub mod clean;
pub mod configure;
pub mod generate;
pub mod list;
pub mod run;

use crate::condition;
use crate::config::{self, PxConfig};
use crate::model::PresetFile;
use crate::paths;
use crate::ui;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Everything a resolution-side command needs before it builds a registry.
pub(crate) struct Workspace {
    pub root: PathBuf,
    pub config: PxConfig,
    pub file: PresetFile,
    pub host: String,
}

pub(crate) fn load_workspace(project_dir: Option<&Path>) -> Result<Workspace> {
    let root = paths::project_root(project_dir)?;
    let config = config::load_config(&root)?;
    let file = PresetFile::load(&root.join(&config.template.output))?;
    Ok(Workspace {
        root,
        config,
        file,
        host: condition::current_host(),
    })
}

/// Settle on a preset name. A name given on the command line must be in the
/// active set; without one, the operator picks interactively. `None` means
/// there was nothing to pick or the operator backed out.
pub(crate) fn pick_preset(
    prompt: &str,
    what: &str,
    available: Vec<String>,
    given: Option<String>,
) -> Result<Option<String>> {
    if let Some(name) = given {
        if available.iter().any(|candidate| *candidate == name) {
            return Ok(Some(name));
        }
        bail!("{what} preset '{name}' is not usable on this host (see `px list`)");
    }
    if available.is_empty() {
        ui::warn(format!("no {what} presets are usable on this host"));
        return Ok(None);
    }
    match inquire::Select::new(prompt, available).prompt() {
        Ok(choice) => Ok(Some(choice)),
        Err(
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted,
        ) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

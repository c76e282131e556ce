mod core;
mod template;

pub use self::core::{display_os_name, os_slug, sanitize_name, Generator};
pub use self::template::{
    cmake_bool, FlagSet, PlatformSpec, StepArgs, StepSpec, StepSpecKind, TemplateFile,
    WorkflowGroup,
};

//! # prex - CMake Preset Toolkit
//!
//! prex (pronounced "p-rex") generates complete `CMakePresets.json` graphs
//! from compact multi-platform templates and resolves which presets are
//! actually usable on the host you are running on.
//!
//! ## Features
//!
//! - **Template Expansion**: One platform spec becomes a hidden base preset
//!   plus debug/release configure presets, build/test presets and workflows
//! - **Host Resolution**: Filters the preset graph down to the subset whose
//!   conditions hold for the current operating system
//! - **Workflow Validation**: Every workflow step is checked transitively
//!   against the configure presets it depends on
//! - **Preset Execution**: Drives `cmake`, `ctest` and `cpack` with the
//!   chosen preset, streaming colorized output
//!
//! ## Quick Start
//!
//! ```bash
//! # Generate CMakePresets.json from the template
//! px generate
//!
//! # See what is usable on this machine, then run a workflow
//! px list
//! px workflow
//! ```
//!
//! ## Module Organization
//!
//! - [`model`] - The preset graph data model (`CMakePresets.json`)
//! - [`generate`] - Template parsing and graph generation
//! - [`resolve`] - Per-host validity/visibility filtering and workflow activation
//! - [`commands`] - CLI command handlers

/// CLI command handlers extracted from main.
pub mod commands;

/// Host condition evaluation (`${hostSystemName}` clauses).
pub mod condition;

/// Tool configuration file parsing (`px.toml`).
pub mod config;

/// Preset graph generation from templates.
pub mod generate;

/// Attribute resolution along configure-preset inheritance chains.
pub mod inherit;

/// Preset graph data model and (de)serialization.
pub mod model;

/// Build/install directory resolution and cleanup.
pub mod paths;

/// Name-keyed view over all presets of every kind.
pub mod registry;

/// Per-host preset filtering and workflow activation.
pub mod resolve;

/// Subprocess execution with streamed, colorized output.
pub mod runner;

/// Terminal UI utilities (tables, diagnostic coloring).
pub mod ui;

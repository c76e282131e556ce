//! # px CLI Entry Point
//!
//! This is the main executable for the `px` command-line tool.
//! It parses CLI arguments using clap and routes commands to the handlers
//! in `prex::commands`.
//!
//! ## Command Structure
//!
//! - **Graph**: `generate`, `list`
//! - **Presets**: `configure`, `build`, `test`, `package`, `workflow`
//! - **Maintenance**: `install`, `clean`, `completions`

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::*;
use std::path::PathBuf;

use prex::commands;

#[derive(Parser)]
#[command(name = "px")]
#[command(about = "The CMake preset toolkit", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root directory (overrides the PROJECT_DIR environment variable)
    #[arg(long, global = true, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate CMakePresets.json from the preset template
    Generate {
        /// Template file [default: preset-template.json, or px.toml's template.path]
        #[arg(long)]
        template: Option<PathBuf>,
        /// Output file [default: CMakePresets.json]
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the presets usable on this host
    List,
    /// Run a configure preset (resolves build and install directories)
    Configure {
        /// Configure preset name (interactive pick when omitted)
        preset: Option<String>,
        /// Install directory, relative to the project root
        #[arg(long)]
        install_prefix: Option<String>,
        /// Delete the build and install directories first
        #[arg(long)]
        fresh: bool,
    },
    /// Run a build preset
    Build {
        /// Build preset name (interactive pick when omitted)
        preset: Option<String>,
        /// Build a single target instead of the preset's default
        #[arg(long)]
        target: Option<String>,
    },
    /// Run a test preset
    Test {
        /// Test preset name (interactive pick when omitted)
        preset: Option<String>,
    },
    /// Run a package preset
    Package {
        /// Package preset name (interactive pick when omitted)
        preset: Option<String>,
    },
    /// Run a workflow preset end to end
    Workflow {
        /// Workflow preset name (interactive pick when omitted)
        preset: Option<String>,
    },
    /// Install a configured preset's build output
    Install {
        /// Configure preset name (interactive pick when omitted)
        preset: Option<String>,
    },
    /// Clean a configure preset's build directory
    Clean {
        /// Configure preset name (interactive pick when omitted)
        preset: Option<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let project_dir = cli.project_dir.as_deref();

    let outcome = match cli.command {
        Commands::Generate { template, output } => {
            commands::generate::generate(project_dir, template.as_deref(), output.as_deref())
        }
        Commands::List => commands::list::list(project_dir),
        Commands::Configure {
            preset,
            install_prefix,
            fresh,
        } => commands::configure::configure(project_dir, preset, install_prefix, fresh),
        Commands::Build { preset, target } => commands::run::build(project_dir, preset, target),
        Commands::Test { preset } => commands::run::test(project_dir, preset),
        Commands::Package { preset } => commands::run::package(project_dir, preset),
        Commands::Workflow { preset } => commands::run::workflow(project_dir, preset),
        Commands::Install { preset } => commands::configure::install(project_dir, preset),
        Commands::Clean { preset } => commands::clean::clean(project_dir, preset),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "px", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(error) = outcome {
        eprintln!("{} {error:#}", "✗".red());
        std::process::exit(1);
    }
}

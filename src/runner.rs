//! Subprocess execution with streamed, colorized output.
//!
//! cmake and ninja interleave progress and diagnostics on both pipes, and a
//! child that fills one pipe while nothing reads it deadlocks. Each stream
//! is therefore drained by its own thread as lines arrive; the parent joins
//! both drains and only then collects the exit status. Line order is
//! preserved within a stream, never across the two.

use crate::ui;
use anyhow::{Context, Result};
use colored::*;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

/// The environment a child process runs with, captured once and passed
/// explicitly instead of read ambiently at spawn time.
#[derive(Debug, Clone)]
pub struct ExecEnv {
    vars: Vec<(OsString, OsString)>,
}

impl ExecEnv {
    /// Snapshot the current process environment.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        let key = key.into();
        self.vars.retain(|(existing, _)| *existing != key);
        self.vars.push((key, value.into()));
    }
}

fn drain_colorized(stream: impl Read) {
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        match line {
            Ok(line) => println!("{}", ui::color_diagnostic_line(&line)),
            Err(_) => break,
        }
    }
}

/// Run a command, streaming both output pipes through the diagnostic
/// colorizer. Returns `Ok(true)` iff the child exited with code zero.
/// Failures are reported, never retried.
pub fn run_streamed(program: &str, args: &[String], env: &ExecEnv, cwd: &Path) -> Result<bool> {
    println!(
        "\n{} {} {}",
        "▶".blue(),
        program.bold(),
        args.join(" ")
    );

    let spawned = Command::new(program)
        .args(args)
        .env_clear()
        .envs(env.vars.iter().map(|(k, v)| (k.clone(), v.clone())))
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            ui::error(format!(
                "command '{program}' not found; make sure it is installed and on PATH"
            ));
            return Ok(false);
        }
        Err(error) => {
            return Err(error).with_context(|| format!("failed to launch '{program}'"));
        }
    };

    // Both pipes are piped above, so the handles are present.
    let stdout = child
        .stdout
        .take()
        .context("child stdout was not captured")?;
    let stderr = child
        .stderr
        .take()
        .context("child stderr was not captured")?;

    let stdout_drain = thread::spawn(move || drain_colorized(stdout));
    let stderr_drain = thread::spawn(move || drain_colorized(stderr));
    let _ = stdout_drain.join();
    let _ = stderr_drain.join();

    let status = child
        .wait()
        .with_context(|| format!("failed waiting for '{program}'"))?;

    if status.success() {
        ui::status("Command finished (exit code 0)");
        Ok(true)
    } else {
        ui::error(format!(
            "'{program} {}' failed with {status}",
            args.join(" ")
        ));
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_env_set_replaces_existing() {
        let mut env = ExecEnv::capture();
        env.set("PX_TEST_VAR", "one");
        env.set("PX_TEST_VAR", "two");
        let hits: Vec<_> = env
            .vars
            .iter()
            .filter(|(key, _)| key.as_os_str() == "PX_TEST_VAR")
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, "two");
    }

    #[test]
    #[cfg(unix)]
    fn missing_command_is_reported_not_fatal() {
        let env = ExecEnv::capture();
        let ran = run_streamed(
            "px-definitely-not-a-real-tool",
            &[],
            &env,
            Path::new("."),
        )
        .unwrap();
        assert!(!ran);
    }

    #[test]
    #[cfg(unix)]
    fn exit_code_decides_success() {
        let env = ExecEnv::capture();
        assert!(run_streamed("true", &[], &env, Path::new(".")).unwrap());
        assert!(!run_streamed("false", &[], &env, Path::new(".")).unwrap());
    }
}

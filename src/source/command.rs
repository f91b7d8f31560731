//! External tool invocation
//!
//! Helm and the registry lister are driven as subprocesses. Going through
//! [`CommandRunner`] keeps the clients testable without the tools installed.

use crate::error::SourceError;
use std::process::Command;

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited successfully
    pub success: bool,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

impl CommandOutput {
    /// Create a successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failed output with the given stderr
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Trait for running external commands
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion and capture its output
    fn run(&self, program: &str, args: &[&str]) -> std::io::Result<CommandOutput>;
}

/// Runner that spawns real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    /// Create a new system command runner
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Run a command and return its stdout, turning any failure into a SourceError
pub fn run_checked(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
) -> Result<String, SourceError> {
    let command_line = render(program, args);
    log::trace!("running `{}`", command_line);

    let output = runner
        .run(program, args)
        .map_err(|e| SourceError::CommandNotFound {
            program: program.to_string(),
            source: e,
        })?;

    if !output.success {
        let stderr = output.stderr.trim();
        let message = if stderr.is_empty() {
            "non-zero exit status".to_string()
        } else {
            stderr.to_string()
        };
        return Err(SourceError::command_failed(command_line, message));
    }

    Ok(output.stdout)
}

/// Render a command line for logs and errors
pub fn render(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

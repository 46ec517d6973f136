//! External process execution.

use std::io::{self, Write};
use std::process::{Command, Output, Stdio};

use tracing::debug;

/// Captured result of an external program that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run that printed `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A run that exited non-zero after printing `stderr`.
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs external programs.
///
/// Every shell-out (speech command, audio players, picker) goes through this
/// trait so callers can be tested without the programs installed.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `program` to completion, capturing stdout and stderr.
    ///
    /// A program that cannot be found surfaces as an `io::ErrorKind::NotFound` error.
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;

    /// Run `program` with `input` written to its stdin, capturing stdout.
    ///
    /// Stderr is inherited so interactive tools can draw on the terminal.
    fn run_with_input(&self, program: &str, args: &[String], input: &str)
    -> io::Result<CommandOutput>;

    /// Whether `program` can be found on `PATH`.
    fn is_installed(&self, program: &str) -> bool;
}

/// [`CommandRunner`] backed by `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        debug!(program, ?args, "Running command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(output.into())
    }

    fn run_with_input(
        &self,
        program: &str,
        args: &[String],
        input: &str,
    ) -> io::Result<CommandOutput> {
        debug!(program, ?args, "Running command with piped input");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // The program may exit before reading everything (e.g. user cancelled).
            if let Err(e) = stdin.write_all(input.as_bytes())
                && e.kind() != io::ErrorKind::BrokenPipe
            {
                return Err(e);
            }
            // stdin is dropped here, sending EOF
        }

        Ok(child.wait_with_output()?.into())
    }

    fn is_installed(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

//! Uniform external command execution.
//!
//! Every stage composes the same primitive with different [`RunFlags`]:
//! "is X true?" is `RunFlags::probe()` (tolerant, captured, silent) and
//! "do X or abort" is `RunFlags::checked()` (must succeed, streamed, logged).
//!
//! Spawning is delegated to a [`ProcessRunner`] so stages can be driven by a
//! scripted runner in tests.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::interrupt;
use crate::utils::shell;

/// A program plus its arguments. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git", args)
    }

    pub fn gh<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("gh", args)
    }

    pub fn command_line(&self) -> String {
        shell::command_line(&self.program, &self.args)
    }
}

/// How the child's stdout/stderr are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Inherit the console.
    Stream,
    /// Pipe and return.
    Capture,
    /// Pipe and drop.
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFlags {
    pub must_succeed: bool,
    pub capture: bool,
    pub silent: bool,
}

impl RunFlags {
    /// Must succeed, stream output, log failure.
    pub const fn checked() -> Self {
        Self {
            must_succeed: true,
            capture: false,
            silent: false,
        }
    }

    /// Failure is a normal result; output streams and failure is logged.
    pub const fn tolerant() -> Self {
        Self {
            must_succeed: false,
            capture: false,
            silent: false,
        }
    }

    /// Tolerant, captured and silent.
    pub const fn probe() -> Self {
        Self {
            must_succeed: false,
            capture: true,
            silent: true,
        }
    }

    pub const fn captured(self) -> Self {
        Self {
            capture: true,
            ..self
        }
    }

    pub const fn silent(self) -> Self {
        Self {
            silent: true,
            ..self
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.capture {
            OutputMode::Capture
        } else if self.silent {
            OutputMode::Discard
        } else {
            OutputMode::Stream
        }
    }
}

/// What the runner observed. Streams are empty unless the mode piped them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RawOutcome {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Process spawning backend.
pub trait ProcessRunner {
    /// Run to completion. An `io::ErrorKind::NotFound` error means the
    /// program could not be located.
    fn spawn(
        &self,
        invocation: &Invocation,
        dir: &Path,
        mode: OutputMode,
    ) -> std::io::Result<RawOutcome>;

    /// Locate a program on the execution path.
    fn resolve(&self, program: &str) -> Option<PathBuf>;
}

/// Real processes via `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn spawn(
        &self,
        invocation: &Invocation,
        dir: &Path,
        mode: OutputMode,
    ) -> std::io::Result<RawOutcome> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).current_dir(dir);

        match mode {
            OutputMode::Stream => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()?;
                Ok(RawOutcome {
                    success: status.success(),
                    exit_code: status.code(),
                    stdout: String::new(),
                    stderr: String::new(),
                })
            }
            OutputMode::Capture | OutputMode::Discard => {
                let output = cmd.stdin(Stdio::null()).output()?;
                let (stdout, stderr) = if mode == OutputMode::Capture {
                    (
                        String::from_utf8_lossy(&output.stdout).to_string(),
                        String::from_utf8_lossy(&output.stderr).to_string(),
                    )
                } else {
                    (String::new(), String::new())
                };
                Ok(RawOutcome {
                    success: output.status.success(),
                    exit_code: output.status.code(),
                    stdout,
                    stderr,
                })
            }
        }
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Outcome of one invocation as seen by a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Captured stdout, trailing whitespace removed; `None` when empty or not captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Captured stderr, same rules as `output`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

impl ExecutionResult {
    /// Captured stdout and stderr joined, for text matching.
    pub fn combined_text(&self) -> String {
        [self.output.as_deref(), self.diagnostics.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn non_empty_trimmed(text: &str) -> Option<String> {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub struct Executor<'a> {
    runner: &'a dyn ProcessRunner,
}

impl<'a> Executor<'a> {
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self { runner }
    }

    pub fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.runner.resolve(program)
    }

    pub fn run(
        &self,
        dir: &Path,
        invocation: &Invocation,
        flags: RunFlags,
    ) -> Result<ExecutionResult> {
        let line = invocation.command_line();

        let outcome = self
            .runner
            .spawn(invocation, dir, flags.output_mode())
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::command_not_found(&invocation.program, &line)
                } else {
                    Error::internal_io(e.to_string(), Some(format!("spawn {}", line)))
                }
            })?;

        // The child shares our process group, so Ctrl+C usually lands here.
        interrupt::check()?;

        if !outcome.success {
            if flags.must_succeed {
                if !flags.silent {
                    log_error!("Command failed: {}", line);
                }
                return Err(Error::command_failed(
                    line,
                    outcome.exit_code,
                    outcome.stderr.trim_end(),
                ));
            }
            if !flags.silent {
                log_warn!("Command failed (continuing): {}", line);
            }
        }

        let (output, diagnostics) = if flags.capture {
            (
                non_empty_trimmed(&outcome.stdout),
                non_empty_trimmed(&outcome.stderr),
            )
        } else {
            (None, None)
        };

        Ok(ExecutionResult {
            success: outcome.success,
            exit_code: outcome.exit_code,
            output,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh", ["-c", script])
    }

    fn tmp() -> PathBuf {
        std::env::temp_dir()
    }

    #[test]
    fn captured_output_is_trimmed_of_trailing_whitespace() {
        let exec = Executor::new(&SystemRunner);
        let result = exec
            .run(&tmp(), &sh("printf '  hello \\n\\n'"), RunFlags::probe())
            .unwrap();
        assert_eq!(result.output.as_deref(), Some("  hello"));
    }

    #[test]
    fn empty_output_is_none() {
        let exec = Executor::new(&SystemRunner);
        let result = exec.run(&tmp(), &sh("true"), RunFlags::probe()).unwrap();
        assert!(result.success);
        assert_eq!(result.output, None);
    }

    #[test]
    fn tolerant_failure_is_a_normal_result() {
        let exec = Executor::new(&SystemRunner);
        let result = exec.run(&tmp(), &sh("exit 3"), RunFlags::probe()).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn checked_failure_is_command_failed() {
        let exec = Executor::new(&SystemRunner);
        let err = exec
            .run(&tmp(), &sh("echo nope >&2; exit 1"), RunFlags::checked().silent())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CommandFailed);
        assert_eq!(err.details["exitCode"], 1);
        assert!(err.details["command"].as_str().unwrap().starts_with("sh -c"));
    }

    #[test]
    fn missing_program_is_fatal_even_when_tolerant() {
        let exec = Executor::new(&SystemRunner);
        let err = exec
            .run(
                &tmp(),
                &Invocation::new("definitely-not-a-real-program-xyz", Vec::<String>::new()),
                RunFlags::probe(),
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CommandNotFound);
    }

    #[test]
    fn uncaptured_runs_return_no_output() {
        let exec = Executor::new(&SystemRunner);
        let result = exec
            .run(&tmp(), &sh("echo hidden"), RunFlags::tolerant().silent())
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, None);
    }

    #[test]
    fn flags_select_output_mode() {
        assert_eq!(RunFlags::checked().output_mode(), OutputMode::Stream);
        assert_eq!(RunFlags::probe().output_mode(), OutputMode::Capture);
        assert_eq!(RunFlags::tolerant().silent().output_mode(), OutputMode::Discard);
        assert_eq!(RunFlags::checked().captured().output_mode(), OutputMode::Capture);
    }

    #[test]
    fn invocation_renders_quoted_command_line() {
        let inv = Invocation::gh([
            "repo",
            "create",
            "my-org/sampler",
            "--description",
            "A sampler",
        ]);
        assert_eq!(
            inv.command_line(),
            "gh repo create my-org/sampler --description 'A sampler'"
        );
    }

    #[test]
    fn resolve_finds_sh() {
        assert!(SystemRunner.resolve("sh").is_some());
        assert!(SystemRunner.resolve("definitely-not-a-real-program-xyz").is_none());
    }
}

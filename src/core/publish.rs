//! Best-effort commit and push of the generated artifacts.

use serde::Serialize;
use std::path::Path;

use crate::artifacts::PUBLISH_PATHS;
use crate::error::Result;
use crate::executor::{Executor, Invocation, RunFlags};

/// A publish step that failed without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishWarning {
    pub step: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReport {
    pub committed: bool,
    pub pushed: bool,
    pub warnings: Vec<PublishWarning>,
}

impl PublishReport {
    fn warn(&mut self, step: &str, message: impl Into<String>) {
        let message = message.into();
        log_warn!("{}: {}", step, message);
        self.warnings.push(PublishWarning {
            step: step.to_string(),
            message,
        });
    }

    /// Record a step outcome. Returns whether the step succeeded.
    /// Interrupts propagate.
    fn step(&mut self, step: &str, outcome: Result<bool>) -> Result<bool> {
        match outcome {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.warn(step, "command exited non-zero");
                Ok(false)
            }
            Err(err) if err.is_interrupted() => Err(err),
            Err(err) => {
                self.warn(step, err.message);
                Ok(false)
            }
        }
    }
}

/// Stage, commit and push the artifact set. Failures become warnings.
pub fn publish(exec: &Executor, dir: &Path, message: &str) -> Result<PublishReport> {
    log_info!("Pushing generated files...");
    let mut report = PublishReport::default();

    let mut add = vec!["add"];
    add.extend(PUBLISH_PATHS);
    let staged = exec
        .run(dir, &Invocation::git(add), RunFlags::tolerant())
        .map(|r| r.success);
    report.step("git add", staged)?;

    let nothing_staged = exec
        .run(
            dir,
            &Invocation::git(["diff", "--cached", "--quiet"]),
            RunFlags::probe(),
        )
        .map(|r| r.success);

    match nothing_staged {
        Ok(true) => log_detail!("No generated changes to commit"),
        Ok(false) => {
            let commit = exec
                .run(
                    dir,
                    &Invocation::git(["commit", "-m", message]),
                    RunFlags::tolerant(),
                )
                .map(|r| r.success);
            report.committed = report.step("git commit", commit)?;
        }
        Err(err) => {
            report.step("git diff", Err(err))?;
        }
    }

    let push = exec
        .run(
            dir,
            &Invocation::git(["push", "origin", "HEAD"]),
            RunFlags::tolerant(),
        )
        .map(|r| r.success);
    report.pushed = report.step("git push", push)?;

    if report.warnings.is_empty() {
        log_success!("Generated files pushed");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn step_turns_errors_into_warnings() {
        let mut report = PublishReport::default();
        let ok = report
            .step("git push", Err(Error::command_not_found("git", "git push")))
            .unwrap();
        assert!(!ok);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].step, "git push");
    }

    #[test]
    fn step_propagates_interrupts() {
        let mut report = PublishReport::default();
        let err = report.step("git push", Err(Error::interrupted())).unwrap_err();
        assert!(err.is_interrupted());
        assert!(report.warnings.is_empty());
    }
}

//! Preflight checks: required tools, remote-host authentication, and
//! advisory project files.

use serde::Serialize;
use std::path::Path;

use crate::context::Identity;
use crate::error::{Error, Result};
use crate::executor::{Executor, Invocation, RunFlags};
use crate::console;

const TOOL_COLUMN: usize = 10;
const FILE_COLUMN: usize = 40;

/// Probe every required tool and fail once with the full list of missing ones.
pub fn check_tools(exec: &Executor, tools: &[String]) -> Result<()> {
    log_info!("Verifying required tools...");

    let mut missing = Vec::new();
    for tool in tools {
        let found = exec.resolve(tool).is_some();
        console::check_row(tool, TOOL_COLUMN, found);
        if !found {
            missing.push(tool.clone());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::tool_not_found(missing))
    }
}

/// Confirm an active `gh` session and resolve the identity used for commits.
pub fn authenticate(exec: &Executor, dir: &Path, host: &str) -> Result<Identity> {
    log_info!("Verifying {} authentication...", host);

    // gh exits non-zero when any stored account is broken, even with a
    // working active one, so only the text decides here.
    let status = exec.run(dir, &Invocation::gh(["auth", "status"]), RunFlags::probe())?;
    let text = status.combined_text();
    if text.is_empty() || text.to_lowercase().contains("not logged in") {
        return Err(Error::not_authenticated(host, "no active session"));
    }

    let user = exec
        .run(
            dir,
            &Invocation::gh(["api", "user", "-q", ".login"]),
            RunFlags::probe(),
        )?
        .output
        .filter(|login| !login.trim().is_empty());

    let Some(username) = user else {
        return Err(Error::not_authenticated(
            host,
            "could not resolve the authenticated user",
        ));
    };

    let email = exec
        .run(
            dir,
            &Invocation::gh(["api", "user", "-q", ".email"]),
            RunFlags::probe(),
        )?
        .output;

    let identity = Identity::new(username.trim(), email, host);
    log_success!("Authenticated as: {}", identity.username);
    log_detail!("Email: {}", identity.email);
    Ok(identity)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

/// Report which expected project files exist. Never fails.
pub fn check_files(dir: &Path, files: &[String]) -> FileReport {
    log_info!("Verifying local files in {}...", dir.display());

    let mut report = FileReport::default();
    for file in files {
        if dir.join(file).exists() {
            console::check_row(file, FILE_COLUMN, true);
            report.present.push(file.clone());
        } else {
            log_warn!("{:<width$}  missing", file, width = FILE_COLUMN);
            report.missing.push(file.clone());
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn check_files_splits_present_and_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let files = vec!["package.json".to_string(), "Dockerfile".to_string()];
        let report = check_files(dir.path(), &files);

        assert_eq!(report.present, vec!["package.json"]);
        assert_eq!(report.missing, vec!["Dockerfile"]);
    }
}

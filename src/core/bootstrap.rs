//! Local repository bootstrap: init, identity, first commit.
//!
//! Both steps are safe to repeat against an already-initialized directory.

use serde::Serialize;

use crate::context::RunContext;
use crate::defaults::MessageConfig;
use crate::error::Result;
use crate::executor::{Executor, Invocation, RunFlags};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapReport {
    /// `git init` ran on this invocation.
    pub initialized: bool,
    /// A commit was created on this invocation.
    pub committed: bool,
}

/// Initialize `.git` if absent and set the commit identity.
///
/// Returns whether `git init` ran.
pub fn init_repository(exec: &Executor, ctx: &RunContext) -> Result<bool> {
    log_info!("Initializing git repository...");
    let dir = &ctx.working_dir;
    let identity = ctx.identity()?;

    let initialized = if dir.join(".git").exists() {
        log_detail!("Git repository already initialized");
        false
    } else {
        exec.run(dir, &Invocation::git(["init"]), RunFlags::checked())?;
        log_success!("Git repository initialized");
        true
    };

    exec.run(
        dir,
        &Invocation::git(["config", "user.name", identity.username.as_str()]),
        RunFlags::checked(),
    )?;
    exec.run(
        dir,
        &Invocation::git(["config", "user.email", identity.email.as_str()]),
        RunFlags::checked(),
    )?;

    Ok(initialized)
}

/// Stage everything and commit, unless nothing changed.
///
/// Returns whether a commit was created.
pub fn commit_initial(
    exec: &Executor,
    ctx: &RunContext,
    messages: &MessageConfig,
) -> Result<bool> {
    log_info!("Staging and committing files...");
    let dir = &ctx.working_dir;

    exec.run(dir, &Invocation::git(["add", "."]), RunFlags::checked())?;

    let status = exec.run(
        dir,
        &Invocation::git(["status", "--porcelain"]),
        RunFlags::probe(),
    )?;
    if status.output.is_none() {
        log_detail!("No changes to commit");
        return Ok(false);
    }

    let message = format!("{}: {}", messages.initial_commit_prefix, ctx.display_name);
    exec.run(
        dir,
        &Invocation::git(["commit", "-m", message.as_str()]),
        RunFlags::checked(),
    )?;
    log_success!("Created initial commit");
    Ok(true)
}

/// Both bootstrap steps in order.
pub fn bootstrap(
    exec: &Executor,
    ctx: &RunContext,
    messages: &MessageConfig,
) -> Result<BootstrapReport> {
    let initialized = init_repository(exec, ctx)?;
    let committed = commit_initial(exec, ctx, messages)?;
    Ok(BootstrapReport {
        initialized,
        committed,
    })
}

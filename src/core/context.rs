//! The run context threaded through every pipeline stage.

use heck::ToTitleCase;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::validation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
    pub email: String,
}

impl Identity {
    /// Build an identity, synthesizing the host's noreply address when the
    /// host does not expose an email.
    pub fn new(username: impl Into<String>, email: Option<String>, host: &str) -> Self {
        let username = username.into();
        let email = email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty() && e != "null")
            .unwrap_or_else(|| noreply_email(&username, host));
        Self { username, email }
    }
}

pub fn noreply_email(username: &str, host: &str) -> String {
    format!("{}@users.noreply.{}", username, host)
}

/// `{org}/{repo}` when an organization is given, else `{repo}`.
pub fn qualified_name(repo_name: &str, org: Option<&str>) -> String {
    match org {
        Some(org) => format!("{}/{}", org, repo_name),
        None => repo_name.to_string(),
    }
}

/// `strudel-sampler` becomes `Strudel Sampler`.
pub fn display_name(repo_name: &str) -> String {
    repo_name.to_title_case()
}

/// Mutable state for one run. Created once, owned by the pipeline and lent
/// to stages by reference.
#[derive(Debug)]
pub struct RunContext {
    pub working_dir: PathBuf,
    pub repo_name: String,
    pub org: Option<String>,
    pub description: String,
    pub display_name: String,
    pub identity: Option<Identity>,
    pub remote_url: Option<String>,
}

impl RunContext {
    pub fn new(
        repo_name: &str,
        org: Option<&str>,
        description: &str,
        working_dir: &Path,
    ) -> Result<Self> {
        let repo_name = validation::require_name_segment(repo_name, "repo-name")?.to_string();
        let org = org
            .map(|o| validation::require_name_segment(o, "org").map(str::to_string))
            .transpose()?;

        Ok(Self {
            working_dir: resolve_working_dir(working_dir)?,
            display_name: display_name(&repo_name),
            repo_name,
            org,
            description: description.to_string(),
            identity: None,
            remote_url: None,
        })
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.repo_name, self.org.as_deref())
    }

    /// Organization if given, else the authenticated user.
    pub fn owner(&self) -> Option<&str> {
        self.org
            .as_deref()
            .or_else(|| self.identity.as_ref().map(|i| i.username.as_str()))
    }

    pub fn identity(&self) -> Result<&Identity> {
        self.identity.as_ref().ok_or_else(|| {
            Error::internal_unexpected("identity is resolved during authentication")
        })
    }
}

fn resolve_working_dir(path: &Path) -> Result<PathBuf> {
    let display = path.display().to_string();
    let resolved = path.canonicalize().map_err(|e| {
        Error::local_state(format!("Cannot access working directory: {}", e), &display)
    })?;

    if !resolved.is_dir() {
        return Err(Error::local_state("Working directory is not a directory", display));
    }

    Ok(resolved)
}

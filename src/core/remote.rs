//! Remote repository provisioning through the `gh` CLI.

use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::executor::{Executor, Invocation, RunFlags};

pub fn create_invocation(qualified_name: &str, description: &str) -> Invocation {
    Invocation::gh([
        "repo",
        "create",
        qualified_name,
        "--public",
        "--description",
        description,
        "--source=.",
        "--push",
        "--remote=origin",
    ])
}

/// URL used when the host cannot be asked for the canonical one.
pub fn fallback_url(host: &str, owner: Option<&str>, repo_name: &str) -> String {
    match owner {
        Some(owner) => format!("https://{}/{}/{}", host, owner, repo_name),
        None => format!("https://{}/{}", host, repo_name),
    }
}

/// Create the public remote, push the first commit, and record the URL on
/// the context.
///
/// Not idempotent: the name is assumed unused, and a collision surfaces as
/// `RemoteCreationFailed`.
pub fn provision(exec: &Executor, ctx: &mut RunContext, host: &str) -> Result<String> {
    let full_name = ctx.qualified_name();
    log_info!("Creating repository: {}...", full_name);

    exec.run(
        &ctx.working_dir,
        &create_invocation(&full_name, &ctx.description),
        RunFlags::checked(),
    )
    .map_err(|e| Error::remote_creation_failed(&full_name, e))?;
    log_success!("Repository created: {}", full_name);

    let view = exec.run(
        &ctx.working_dir,
        &Invocation::gh(["repo", "view", full_name.as_str(), "--json", "url", "-q", ".url"]),
        RunFlags::probe(),
    )?;

    let url = match view.output.filter(|_| view.success) {
        Some(url) => url.trim().to_string(),
        None => {
            let url = fallback_url(host, ctx.owner(), &ctx.repo_name);
            log_warn!("Could not resolve repository URL, using {}", url);
            url
        }
    };

    log_detail!("URL: {}", url);
    ctx.remote_url = Some(url.clone());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_invocation_wires_source_and_remote() {
        let inv = create_invocation("my-org/sampler", "Production sampler");
        assert_eq!(inv.program, "gh");
        assert_eq!(
            inv.args,
            vec![
                "repo",
                "create",
                "my-org/sampler",
                "--public",
                "--description",
                "Production sampler",
                "--source=.",
                "--push",
                "--remote=origin",
            ]
        );
    }

    #[test]
    fn fallback_url_prefers_owner() {
        assert_eq!(
            fallback_url("github.com", Some("octocat"), "sampler"),
            "https://github.com/octocat/sampler"
        );
        assert_eq!(fallback_url("github.com", None, "sampler"), "https://github.com/sampler");
    }
}

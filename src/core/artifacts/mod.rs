//! Artifact synthesis: the fixed set of CI, community and deployment files.

pub mod stack;
pub mod templates;

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::defaults::LaunchConfig;
use crate::error::{Error, Result};
use crate::utils::io;

use stack::{StackDescriptor, StackRenderer};
use templates::{EnvTemplate, Template};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    /// Relative to the project root.
    pub path: &'static str,
    pub content: String,
}

/// Top-level entries staged by the publish commit.
pub const PUBLISH_PATHS: [&str; 7] = [
    ".github",
    "PULL_REQUEST_TEMPLATE.md",
    "CODE_OF_CONDUCT.md",
    "CONTRIBUTING.md",
    "SECURITY.md",
    stack::STACK_PATH,
    EnvTemplate::PATH,
];

/// Render every artifact. Same inputs, same bytes.
pub fn synthesize(
    config: &LaunchConfig,
    display_name: &str,
    renderer: &dyn StackRenderer,
) -> Vec<GeneratedArtifact> {
    let mut artifacts = templates::render_documents(config, display_name);

    let descriptor = StackDescriptor::from_config(&config.stack);
    artifacts.push(GeneratedArtifact {
        path: stack::STACK_PATH,
        content: stack::render_with_fallback(renderer, &descriptor),
    });
    artifacts.push(templates::artifact(&EnvTemplate::from_stack(&config.stack)));

    artifacts
}

/// Write artifacts under `dir`, creating directories and overwriting files.
pub fn write_all(dir: &Path, artifacts: &[GeneratedArtifact]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let path = dir.join(artifact.path);
        io::write_file(&path, &artifact.content, &format!("write {}", artifact.path))
            .map_err(|e| Error::local_state(e.message, path.display().to_string()))?;
        log_detail!("Created: {}", artifact.path);
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stack::ManualRenderer;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn synthesize_produces_fixed_ordered_set() {
        let artifacts = synthesize(&LaunchConfig::default(), "Strudel Sampler", &ManualRenderer);
        let paths: Vec<&str> = artifacts.iter().map(|a| a.path).collect();
        assert_eq!(
            paths,
            vec![
                ".github/workflows/build.yml",
                ".github/workflows/docker.yml",
                ".github/workflows/release.yml",
                ".github/ISSUE_TEMPLATE/bug_report.md",
                ".github/ISSUE_TEMPLATE/feature_request.md",
                "PULL_REQUEST_TEMPLATE.md",
                "CODE_OF_CONDUCT.md",
                "CONTRIBUTING.md",
                "SECURITY.md",
                "docker-compose.yml",
                ".env.portainer",
            ]
        );
    }

    #[test]
    fn every_artifact_is_covered_by_publish_paths() {
        let artifacts = synthesize(&LaunchConfig::default(), "Sampler", &ManualRenderer);
        for artifact in &artifacts {
            let top = artifact.path.split('/').next().unwrap_or_default();
            assert!(PUBLISH_PATHS.contains(&top), "{} not staged", artifact.path);
        }
    }

    #[test]
    fn write_all_overwrites_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("SECURITY.md"), "stale").unwrap();

        let artifacts = synthesize(&LaunchConfig::default(), "Sampler", &ManualRenderer);
        let written = write_all(dir.path(), &artifacts).unwrap();

        assert_eq!(written.len(), artifacts.len());
        let security = fs::read_to_string(dir.path().join("SECURITY.md")).unwrap();
        assert!(security.starts_with("# Security Policy"));
        assert!(dir.path().join(".github/ISSUE_TEMPLATE/bug_report.md").is_file());
    }

    #[test]
    fn write_failure_is_local_state_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the .github directory should go.
        fs::write(dir.path().join(".github"), "").unwrap();

        let artifacts = synthesize(&LaunchConfig::default(), "Sampler", &ManualRenderer);
        let err = write_all(dir.path(), &artifacts).unwrap_err();
        assert_eq!(err.code.as_str(), "local.state_error");
    }
}

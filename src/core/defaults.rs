use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::artifacts::stack::ENV_KEYS;
use crate::error::{Error, Result};
use crate::utils::{io, validation};

/// Optional per-project overrides, read from the working directory.
pub const CONFIG_FILE: &str = "repolaunch.json";

pub const DEFAULT_DESCRIPTION: &str = "Strudel Sampler - Production Microservice";

/// Root configuration structure for repolaunch.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_required_tools")]
    pub required_tools: Vec<String>,

    #[serde(default = "default_required_files")]
    pub required_files: Vec<String>,

    #[serde(default)]
    pub workflows: WorkflowConfig,

    #[serde(default)]
    pub community: CommunityConfig,

    #[serde(default)]
    pub stack: StackConfig,

    #[serde(default)]
    pub messages: MessageConfig,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            required_tools: default_required_tools(),
            required_files: default_required_files(),
            workflows: WorkflowConfig::default(),
            community: CommunityConfig::default(),
            stack: StackConfig::default(),
            messages: MessageConfig::default(),
        }
    }
}

/// Inputs for the generated GitHub Actions workflows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_node_versions")]
    pub node_versions: Vec<String>,

    #[serde(default = "default_release_node_version")]
    pub release_node_version: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            node_versions: default_node_versions(),
            release_node_version: default_release_node_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityConfig {
    #[serde(default = "default_security_contact")]
    pub security_contact: String,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            security_contact: default_security_contact(),
        }
    }
}

/// The single service described by docker-compose.yml and .env.portainer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    #[serde(default = "default_service")]
    pub service: String,

    #[serde(default = "default_image")]
    pub image: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Host-side variable naming the directory bind-mounted into the service.
    #[serde(default = "default_mount_env_var")]
    pub mount_env_var: String,

    #[serde(default = "default_mount_path")]
    pub mount_path: String,

    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    #[serde(default = "default_cache_max_size")]
    pub cache_max_size: u32,

    #[serde(default = "default_hot_reload")]
    pub hot_reload: bool,

    #[serde(default = "default_health_path")]
    pub health_path: String,

    #[serde(default = "default_health_interval")]
    pub health_interval: String,

    #[serde(default = "default_health_timeout")]
    pub health_timeout: String,

    #[serde(default = "default_health_retries")]
    pub health_retries: u32,

    #[serde(default = "default_health_start_period")]
    pub health_start_period: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            image: default_image(),
            port: default_port(),
            mount_env_var: default_mount_env_var(),
            mount_path: default_mount_path(),
            cache_ttl_ms: default_cache_ttl_ms(),
            cache_max_size: default_cache_max_size(),
            hot_reload: default_hot_reload(),
            health_path: default_health_path(),
            health_interval: default_health_interval(),
            health_timeout: default_health_timeout(),
            health_retries: default_health_retries(),
            health_start_period: default_health_start_period(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Followed by ": {display name}".
    #[serde(default = "default_initial_commit_prefix")]
    pub initial_commit_prefix: String,

    #[serde(default = "default_artifacts_commit")]
    pub artifacts_commit: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            initial_commit_prefix: default_initial_commit_prefix(),
            artifacts_commit: default_artifacts_commit(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_host() -> String {
    "github.com".to_string()
}

fn default_required_tools() -> Vec<String> {
    ["git", "gh", "docker", "node", "npm"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_required_files() -> Vec<String> {
    [
        "vite-plugin-strudel-sampler.ts",
        "sampler-server.ts",
        "vite.config.ts",
        "tsconfig.json",
        "package.json",
        ".env.example",
        "README.md",
        "Dockerfile",
        "docker-compose.yml",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_node_versions() -> Vec<String> {
    vec!["18.x".to_string(), "20.x".to_string()]
}

fn default_release_node_version() -> String {
    "20".to_string()
}

fn default_security_contact() -> String {
    "security@example.com".to_string()
}

fn default_service() -> String {
    "strudel-sampler".to_string()
}

fn default_image() -> String {
    "strudel-sampler:latest".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_mount_env_var() -> String {
    "STRUDEL_SAMPLES".to_string()
}

fn default_mount_path() -> String {
    "/samples".to_string()
}

fn default_cache_ttl_ms() -> u64 {
    3_600_000
}

fn default_cache_max_size() -> u32 {
    500
}

fn default_hot_reload() -> bool {
    true
}

fn default_health_path() -> String {
    "/stats".to_string()
}

fn default_health_interval() -> String {
    "30s".to_string()
}

fn default_health_timeout() -> String {
    "10s".to_string()
}

fn default_health_retries() -> u32 {
    3
}

fn default_health_start_period() -> String {
    "20s".to_string()
}

fn default_initial_commit_prefix() -> String {
    "Initial commit".to_string()
}

fn default_artifacts_commit() -> String {
    "ci: add GitHub Actions, templates, and Portainer configuration".to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load repolaunch.json from `dir`, merging it over built-in defaults.
///
/// A missing file yields the defaults. An unreadable or malformed file is an
/// error.
pub fn load_config(dir: &Path) -> Result<LaunchConfig> {
    let path = dir.join(CONFIG_FILE);
    let display = path.display().to_string();

    let Some(content) = io::read_optional(&path, &format!("read {}", display))? else {
        return Ok(LaunchConfig::default());
    };

    let config: LaunchConfig =
        serde_json::from_str(&content).map_err(|e| Error::config_invalid_json(display, e))?;
    validate_stack(&config.stack)?;
    Ok(config)
}

/// The service name becomes a compose key and the mount variable joins the
/// fixed env block, so both must be usable there.
fn validate_stack(stack: &StackConfig) -> Result<()> {
    validation::require_name_segment(&stack.service, "stack.service")?;
    let mount = validation::require_env_name(&stack.mount_env_var, "stack.mount_env_var")?;

    if ENV_KEYS.iter().any(|key| *key == mount) {
        return Err(Error::validation_invalid_argument(
            "stack.mount_env_var",
            format!("stack.mount_env_var '{}' collides with a built-in stack variable", mount),
            Some(mount.to_string()),
            Some(ENV_KEYS.iter().map(|k| k.to_string()).collect()),
        )
        .with_hint(format!("Pick a name other than {}", ENV_KEYS.join(", "))));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.host, "github.com");
        assert_eq!(config.required_tools, vec!["git", "gh", "docker", "node", "npm"]);
        assert_eq!(config.stack.port, 5432);
        assert_eq!(config.stack.mount_env_var, "STRUDEL_SAMPLES");
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "stack": { "port": 8080 }, "required_tools": ["git", "gh"] }"#,
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.stack.port, 8080);
        assert_eq!(config.stack.service, "strudel-sampler");
        assert_eq!(config.stack.cache_ttl_ms, 3_600_000);
        assert_eq!(config.required_tools, vec!["git", "gh"]);
        assert_eq!(config.workflows.node_versions, vec!["18.x", "20.x"]);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        let err = load_config(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn mount_env_var_may_not_shadow_a_stack_key() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "stack": { "mount_env_var": "PORT" } }"#,
        )
        .unwrap();

        let err = load_config(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert!(err.message.contains("PORT"));
    }

    #[test]
    fn service_must_be_a_name_segment() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "stack": { "service": "bad name" } }"#,
        )
        .unwrap();

        let err = load_config(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }
}

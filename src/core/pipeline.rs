//! The fixed-order deployment pipeline.
//!
//! Every stage before PUBLISH is fail-fast. PUBLISH collects warnings and only
//! aborts on interrupt. SUMMARIZE always runs once PUBLISH is reached.

use serde::Serialize;

use crate::artifacts::{self, stack::StackRenderer};
use crate::bootstrap::{self, BootstrapReport};
use crate::console;
use crate::context::RunContext;
use crate::defaults::LaunchConfig;
use crate::error::Result;
use crate::executor::Executor;
use crate::interrupt;
use crate::preflight::{self, FileReport};
use crate::publish::{self, PublishReport};
use crate::remote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preflight,
    Authenticate,
    BootstrapLocal,
    CommitInitial,
    ProvisionRemote,
    SynthesizeArtifacts,
    Publish,
    Summarize,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Preflight => "preflight",
            Stage::Authenticate => "authenticate",
            Stage::BootstrapLocal => "bootstrap_local",
            Stage::CommitInitial => "commit_initial",
            Stage::ProvisionRemote => "provision_remote",
            Stage::SynthesizeArtifacts => "synthesize_artifacts",
            Stage::Publish => "publish",
            Stage::Summarize => "summarize",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub skip_checks: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub repo_name: String,
    pub qualified_name: String,
    pub display_name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub completed_stages: Vec<Stage>,
    pub artifacts: Vec<String>,
    pub missing_files: Vec<String>,
    pub bootstrap: BootstrapReport,
    pub publish: PublishReport,
}

pub struct Orchestrator<'a> {
    ctx: RunContext,
    config: LaunchConfig,
    exec: Executor<'a>,
    renderer: Box<dyn StackRenderer>,
    options: RunOptions,
    completed: Vec<Stage>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        ctx: RunContext,
        config: LaunchConfig,
        exec: Executor<'a>,
        renderer: Box<dyn StackRenderer>,
        options: RunOptions,
    ) -> Self {
        Self {
            ctx,
            config,
            exec,
            renderer,
            options,
            completed: Vec::new(),
        }
    }

    fn enter(&self, stage: Stage) -> Result<()> {
        interrupt::check()?;
        log_detail!("stage: {}", stage.label());
        Ok(())
    }

    fn done(&mut self, stage: Stage) {
        self.completed.push(stage);
    }

    pub fn run(mut self) -> Result<RunSummary> {
        console::section(&format!(
            "{} - AUTONOMOUS DEPLOYMENT",
            self.ctx.display_name.to_uppercase()
        ));

        if !self.options.skip_checks {
            self.enter(Stage::Preflight)?;
            preflight::check_tools(&self.exec, &self.config.required_tools)?;
            self.done(Stage::Preflight);
        }

        self.enter(Stage::Authenticate)?;
        let identity =
            preflight::authenticate(&self.exec, &self.ctx.working_dir, &self.config.host)?;
        self.ctx.identity = Some(identity);
        self.done(Stage::Authenticate);

        let files = preflight::check_files(&self.ctx.working_dir, &self.config.required_files);

        self.enter(Stage::BootstrapLocal)?;
        let initialized = bootstrap::init_repository(&self.exec, &self.ctx)?;
        self.done(Stage::BootstrapLocal);

        self.enter(Stage::CommitInitial)?;
        let committed =
            bootstrap::commit_initial(&self.exec, &self.ctx, &self.config.messages)?;
        self.done(Stage::CommitInitial);

        self.enter(Stage::ProvisionRemote)?;
        let url = remote::provision(&self.exec, &mut self.ctx, &self.config.host)?;
        self.done(Stage::ProvisionRemote);

        self.enter(Stage::SynthesizeArtifacts)?;
        log_info!("Generating CI, community and deployment files...");
        let generated =
            artifacts::synthesize(&self.config, &self.ctx.display_name, self.renderer.as_ref());
        artifacts::write_all(&self.ctx.working_dir, &generated)?;
        self.done(Stage::SynthesizeArtifacts);

        self.enter(Stage::Publish)?;
        let published = publish::publish(
            &self.exec,
            &self.ctx.working_dir,
            &self.config.messages.artifacts_commit,
        )?;
        self.done(Stage::Publish);

        self.done(Stage::Summarize);
        let summary = RunSummary {
            repo_name: self.ctx.repo_name.clone(),
            qualified_name: self.ctx.qualified_name(),
            display_name: self.ctx.display_name.clone(),
            url,
            owner: self.ctx.owner().map(str::to_string),
            completed_stages: self.completed,
            artifacts: generated.iter().map(|a| a.path.to_string()).collect(),
            missing_files: files.missing.clone(),
            bootstrap: BootstrapReport {
                initialized,
                committed,
            },
            publish: published,
        };

        print_summary(&summary, &files, &self.config);
        Ok(summary)
    }
}

/// Operator-facing wrap-up: repository info, next steps, container commands.
pub fn print_summary(summary: &RunSummary, files: &FileReport, config: &LaunchConfig) {
    let stack = &config.stack;

    console::section("DEPLOYMENT COMPLETE");

    log_info!("Repository:");
    log_detail!("Name:  {}", summary.qualified_name);
    log_detail!("URL:   {}", summary.url);
    if let Some(owner) = &summary.owner {
        log_detail!("Owner: {}", owner);
    }

    log_info!("Generated:");
    log_detail!("GitHub Actions (build, docker, release)");
    log_detail!("Issue and pull request templates, community files");
    log_detail!("Portainer stack and environment template");

    if !files.missing.is_empty() {
        log_warn!("Missing project files: {}", files.missing.join(", "));
    }
    for warning in &summary.publish.warnings {
        log_warn!("Publish {}: {}", warning.step, warning.message);
    }

    log_info!("Next steps:");
    log_detail!("1. Monitor workflows: {}/actions", summary.url);
    log_detail!("2. Deploy with Portainer:");
    log_detail!("   - Stacks → Add Stack");
    log_detail!("   - Paste {}", artifacts::stack::STACK_PATH);
    log_detail!("   - Set the {} environment variable", stack.mount_env_var);
    log_detail!("3. Access: http://localhost:{}", stack.port);

    log_info!("Docker commands:");
    log_detail!("docker build -t {} .", stack.image);
    log_detail!(
        "docker run -p {port}:{port} -v <samples-dir>:{mount}:ro {image}",
        port = stack.port,
        mount = stack.mount_path,
        image = stack.image
    );
    log_detail!("docker compose up");

    if summary.publish.warnings.is_empty() {
        log_success!("Production ready");
    } else {
        log_success!(
            "Deployed with {} publish warning(s)",
            summary.publish.warnings.len()
        );
    }
}

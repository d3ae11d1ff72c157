use clap::Args;
use std::path::PathBuf;

use repolaunch::artifacts::stack;
use repolaunch::context::RunContext;
use repolaunch::defaults::{self, DEFAULT_DESCRIPTION};
use repolaunch::executor::{Executor, SystemRunner};
use repolaunch::pipeline::{Orchestrator, RunOptions, RunSummary};

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Name of the repository to create
    #[arg(long, value_name = "NAME")]
    pub repo_name: String,

    /// Repository description
    #[arg(long, default_value = DEFAULT_DESCRIPTION)]
    pub description: String,

    /// Create the repository under this organization instead of your account
    #[arg(long, value_name = "ORG")]
    pub org: Option<String>,

    /// Project directory
    #[arg(long, default_value = ".")]
    pub path: String,

    /// Skip required tool checks
    #[arg(long)]
    pub skip_checks: bool,
}

pub fn run(args: DeployArgs) -> repolaunch::Result<RunSummary> {
    let path = PathBuf::from(shellexpand::tilde(&args.path).into_owned());

    let ctx = RunContext::new(
        &args.repo_name,
        args.org.as_deref(),
        &args.description,
        &path,
    )?;
    let config = defaults::load_config(&ctx.working_dir)?;

    let runner = SystemRunner;
    let orchestrator = Orchestrator::new(
        ctx,
        config,
        Executor::new(&runner),
        stack::default_renderer(),
        RunOptions {
            skip_checks: args.skip_checks,
        },
    );

    orchestrator.run()
}

use clap::Parser;
use std::process::ExitCode;

mod commands;
mod output;

use commands::deploy;
use repolaunch::{interrupt, log_error};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "repolaunch")]
#[command(version = VERSION)]
#[command(about = "Provision a GitHub repository with CI and Portainer scaffolding")]
#[command(after_help = "Examples:
  repolaunch --repo-name strudel-sampler
  repolaunch --repo-name sampler --org my-org
  repolaunch --repo-name sampler --description \"Production sampler\"")]
struct Cli {
    #[command(flatten)]
    deploy: deploy::DeployArgs,

    /// Print the run summary as a JSON envelope on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    interrupt::install();

    let json = cli.json;
    let result = deploy::run(cli.deploy);

    if let Err(err) = &result {
        log_error!("{}", err.diagnostic());
    }

    if json {
        let printable = result.as_ref().map_err(Clone::clone);
        if let Err(err) = output::print_result(&printable) {
            log_error!("{}", err.message);
        }
    }

    ExitCode::from(exit_code(&result))
}

/// 0 once the summary is reached, 1 on any abort. Clap exits 2 on its own.
fn exit_code<T>(result: &repolaunch::Result<T>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

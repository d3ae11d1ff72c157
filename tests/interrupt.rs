//! Runs in its own binary: the interrupt flag is process-wide.

mod common;

use tempfile::TempDir;

use common::ScriptedRunner;
use repolaunch::artifacts::stack;
use repolaunch::context::RunContext;
use repolaunch::defaults::LaunchConfig;
use repolaunch::executor::Executor;
use repolaunch::interrupt;
use repolaunch::pipeline::{Orchestrator, RunOptions};

#[test]
fn interrupt_aborts_with_cancelled_diagnostic() {
    let dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::new().authenticated("octocat");
    let ctx = RunContext::new("sampler", None, "desc", dir.path()).unwrap();

    interrupt::request();
    let err = Orchestrator::new(
        ctx,
        LaunchConfig::default(),
        Executor::new(&runner),
        Box::new(stack::ManualRenderer),
        RunOptions::default(),
    )
    .run()
    .unwrap_err();

    assert!(err.is_interrupted());
    assert_eq!(err.diagnostic(), "Deployment cancelled");
    assert!(runner.calls().is_empty());
}

//! Bootstrap against a real `git`. Skipped when git is not installed.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

use repolaunch::bootstrap;
use repolaunch::context::{Identity, RunContext};
use repolaunch::defaults::MessageConfig;
use repolaunch::executor::{Executor, SystemRunner};

fn commit_count(dir: &std::path::Path) -> String {
    let out = Command::new("git")
        .args(["rev-list", "--count", "HEAD"])
        .current_dir(dir)
        .output()
        .unwrap();
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

#[test]
fn bootstrap_twice_creates_one_commit() {
    if which::which("git").is_err() {
        eprintln!("git not installed, skipping");
        return;
    }

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "# sampler\n").unwrap();

    let mut ctx = RunContext::new("strudel-sampler", None, "desc", dir.path()).unwrap();
    ctx.identity = Some(Identity::new("octocat", None, "github.com"));
    let exec = Executor::new(&SystemRunner);
    let messages = MessageConfig::default();

    let first = bootstrap::bootstrap(&exec, &ctx, &messages).unwrap();
    assert!(first.initialized);
    assert!(first.committed);

    let second = bootstrap::bootstrap(&exec, &ctx, &messages).unwrap();
    assert!(!second.initialized);
    assert!(!second.committed);

    assert_eq!(commit_count(dir.path()), "1");

    let log = Command::new("git")
        .args(["log", "-1", "--format=%s"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(
        String::from_utf8_lossy(&log.stdout).trim(),
        "Initial commit: Strudel Sampler"
    );
}

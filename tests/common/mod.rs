#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

use repolaunch::executor::{Invocation, OutputMode, ProcessRunner, RawOutcome};

struct Rule {
    prefix: String,
    outcome: RawOutcome,
    once: bool,
}

/// A `ProcessRunner` that records every command line and answers from a
/// script. Unscripted commands succeed with no output.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: RefCell<Vec<Rule>>,
    missing: Vec<String>,
    unspawnable: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every run of a command line starting with `prefix`.
    pub fn on(self, prefix: &str, outcome: RawOutcome) -> Self {
        self.rules.borrow_mut().push(Rule {
            prefix: prefix.to_string(),
            outcome,
            once: false,
        });
        self
    }

    /// The next run only. Once rules are consulted before persistent ones.
    pub fn once(self, prefix: &str, outcome: RawOutcome) -> Self {
        self.rules.borrow_mut().insert(
            0,
            Rule {
                prefix: prefix.to_string(),
                outcome,
                once: true,
            },
        );
        self
    }

    /// Not resolvable on PATH.
    pub fn without_tool(mut self, tool: &str) -> Self {
        self.missing.push(tool.to_string());
        self
    }

    /// Spawning fails with NotFound.
    pub fn unspawnable(mut self, program: &str) -> Self {
        self.unspawnable.push(program.to_string());
        self
    }

    /// A signed-in `gh` session for `login` with no public email.
    pub fn authenticated(self, login: &str) -> Self {
        self.on(
            "gh auth status",
            RawOutcome::ok(format!("github.com\n  ✓ Logged in to github.com account {}", login)),
        )
        .on("gh api user -q .login", RawOutcome::ok(format!("{}\n", login)))
        .on("gh api user -q .email", RawOutcome::ok("null\n"))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c.starts_with(prefix))
    }
}

impl ProcessRunner for ScriptedRunner {
    fn spawn(
        &self,
        invocation: &Invocation,
        _dir: &Path,
        _mode: OutputMode,
    ) -> io::Result<RawOutcome> {
        let line = invocation.command_line();
        self.calls.borrow_mut().push(line.clone());

        if self.unspawnable.contains(&invocation.program) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
        }

        let mut rules = self.rules.borrow_mut();
        match rules.iter().position(|r| line.starts_with(&r.prefix)) {
            Some(index) if rules[index].once => Ok(rules.remove(index).outcome),
            Some(index) => Ok(rules[index].outcome.clone()),
            None => Ok(RawOutcome::ok("")),
        }
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        if self.missing.iter().any(|m| m == program) {
            None
        } else {
            Some(PathBuf::from("/usr/bin").join(program))
        }
    }
}

// src/recipe/kitchen/orchestrator.rs

//! Build orchestration: configure, build and (optionally) test
//!
//! ```text
//! Configured -> Built -> [Tested] -> Done
//!      \           \          \
//!       `-----------`----------`--> Failed
//! ```
//!
//! No step is retried. A failing step is reported with the tool's exit
//! status and captured output. Cancellation is only observed between
//! steps because the external tool cannot be interrupted mid-step.

use crate::config::TestPolicy;
use crate::error::{Error, Result, StepFailure};
use crate::recipe::kitchen::tool::{BuildTool, StepOutput, ToolContext};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strum_macros::Display;
use tracing::{info, warn};

/// States reached by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BuildState {
    Configured,
    Built,
    Tested,
    Done,
    Failed,
}

/// Cooperative cancellation flag checked between steps
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Record of one orchestrator run
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// States reached, in order
    pub states: Vec<BuildState>,
    /// Test failure tolerated under [`TestPolicy::Warn`]
    pub test_failure: Option<StepFailure>,
    /// Combined step output
    pub log: String,
}

impl BuildReport {
    pub fn final_state(&self) -> Option<BuildState> {
        self.states.last().copied()
    }

    pub fn reached(&self, state: BuildState) -> bool {
        self.states.contains(&state)
    }

    fn log_step(&mut self, step: &str, output: &StepOutput) {
        self.log.push_str(&format!("=== {} ===\n", step));
        if !output.stdout.is_empty() {
            self.log.push_str(&output.stdout);
            self.log.push('\n');
        }
        if !output.stderr.is_empty() {
            self.log.push_str(&output.stderr);
            self.log.push('\n');
        }
    }
}

/// Sequences the external tool's steps for one evaluation
pub struct Orchestrator<'a> {
    tool: &'a dyn BuildTool,
    run_tests: bool,
    test_policy: TestPolicy,
    cancel: Option<CancellationToken>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(tool: &'a dyn BuildTool) -> Self {
        Self {
            tool,
            run_tests: true,
            test_policy: TestPolicy::default(),
            cancel: None,
        }
    }

    pub fn run_tests(mut self, run_tests: bool) -> Self {
        self.run_tests = run_tests;
        self
    }

    pub fn test_policy(mut self, policy: TestPolicy) -> Self {
        self.test_policy = policy;
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn check_cancelled(&self, before: &str) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled {
                before: before.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Drive the state machine to `Done` or the first terminal failure
    pub fn run(&self, ctx: &ToolContext) -> Result<BuildReport> {
        let mut report = BuildReport::default();

        self.check_cancelled("configure")?;
        info!("Configuring with {}", self.tool.name());
        let output = self.tool.configure(ctx)?;
        report.log_step("configure", &output);
        if !output.success() {
            return Err(Error::ConfigurationError(output.into_failure("configure")));
        }
        report.states.push(BuildState::Configured);

        self.check_cancelled("build")?;
        match &ctx.target {
            Some(target) => info!("Building target {}", target),
            None => info!("Building"),
        }
        let output = self.tool.build(ctx)?;
        report.log_step("build", &output);
        if !output.success() {
            return Err(Error::BuildError(output.into_failure("build")));
        }
        report.states.push(BuildState::Built);

        if self.run_tests {
            self.check_cancelled("test")?;
            info!("Running tests");
            let output = self.tool.test(ctx)?;
            report.log_step("test", &output);
            if output.success() {
                report.states.push(BuildState::Tested);
            } else {
                let failure = output.into_failure("test");
                match self.test_policy {
                    TestPolicy::Abort => return Err(Error::TestFailure(failure)),
                    TestPolicy::Warn => {
                        warn!("{}", failure);
                        report.test_failure = Some(failure);
                    }
                }
            }
        } else {
            info!("Skipping tests");
        }

        report.states.push(BuildState::Done);
        Ok(report)
    }
}

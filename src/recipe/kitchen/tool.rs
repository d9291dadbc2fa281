// src/recipe/kitchen/tool.rs

//! The external build tool the kitchen drives
//!
//! The kitchen never compiles anything itself. It hands generated
//! configuration to a [`BuildTool`] and treats each call as one opaque,
//! blocking step with an exit status and captured output.

use crate::error::{Error, Result, StepFailure};
use crate::recipe::settings::BuildType;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Captured result of one external tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutput {
    /// Exit status (`None` if the process was killed by a signal)
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StepOutput {
    /// A successful step with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed step with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn into_failure(self, step: &str) -> StepFailure {
        StepFailure {
            step: step.to_string(),
            status: self.status,
            stdout: self.stdout,
            stderr: self.stderr,
        }
    }
}

/// Everything a tool invocation needs to know about the evaluation
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub toolchain_file: PathBuf,
    pub build_type: BuildType,
    /// Only build this target
    pub target: Option<String>,
    pub jobs: Option<u32>,
}

/// An external build tool
pub trait BuildTool: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    fn configure(&self, ctx: &ToolContext) -> Result<StepOutput>;

    fn build(&self, ctx: &ToolContext) -> Result<StepOutput>;

    fn test(&self, ctx: &ToolContext) -> Result<StepOutput>;

    /// Install build outputs under `prefix`
    fn install(&self, ctx: &ToolContext, prefix: &Path) -> Result<StepOutput>;
}

/// CMake driven through its command line
pub struct CMakeTool {
    cmake: PathBuf,
    ctest: PathBuf,
}

impl CMakeTool {
    /// Locate `cmake` and `ctest` in PATH
    pub fn locate() -> Result<Self> {
        let cmake = which::which("cmake")
            .map_err(|e| Error::ToolNotFound(format!("cmake: {}", e)))?;
        let ctest = which::which("ctest")
            .map_err(|e| Error::ToolNotFound(format!("ctest: {}", e)))?;
        Ok(Self { cmake, ctest })
    }

    /// Use explicit binaries
    pub fn with_programs(cmake: impl Into<PathBuf>, ctest: impl Into<PathBuf>) -> Self {
        Self {
            cmake: cmake.into(),
            ctest: ctest.into(),
        }
    }

    fn run(&self, program: &Path, args: &[String], workdir: &Path) -> Result<StepOutput> {
        debug!("Running {} {}", program.display(), args.join(" "));

        let output = Command::new(program)
            .args(args)
            .current_dir(workdir)
            .output()
            .map_err(|e| {
                Error::IoError(format!("Failed to run {}: {}", program.display(), e))
            })?;

        Ok(StepOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn configure_args(ctx: &ToolContext) -> Vec<String> {
    vec![
        "-S".to_string(),
        path_arg(&ctx.source_dir),
        "-B".to_string(),
        path_arg(&ctx.build_dir),
        format!("-DCMAKE_TOOLCHAIN_FILE={}", ctx.toolchain_file.display()),
        format!("-DCMAKE_BUILD_TYPE={}", ctx.build_type),
    ]
}

fn build_args(ctx: &ToolContext) -> Vec<String> {
    let mut args = vec![
        "--build".to_string(),
        path_arg(&ctx.build_dir),
        "--config".to_string(),
        ctx.build_type.to_string(),
    ];
    if let Some(target) = &ctx.target {
        args.push("--target".to_string());
        args.push(target.clone());
    }
    if let Some(jobs) = ctx.jobs {
        args.push("--parallel".to_string());
        args.push(jobs.to_string());
    }
    args
}

fn ctest_args(ctx: &ToolContext) -> Vec<String> {
    vec![
        "--test-dir".to_string(),
        path_arg(&ctx.build_dir),
        "-C".to_string(),
        ctx.build_type.to_string(),
        "--output-on-failure".to_string(),
    ]
}

fn install_args(ctx: &ToolContext, prefix: &Path) -> Vec<String> {
    vec![
        "--install".to_string(),
        path_arg(&ctx.build_dir),
        "--config".to_string(),
        ctx.build_type.to_string(),
        "--prefix".to_string(),
        path_arg(prefix),
    ]
}

impl BuildTool for CMakeTool {
    fn name(&self) -> &str {
        "cmake"
    }

    fn configure(&self, ctx: &ToolContext) -> Result<StepOutput> {
        std::fs::create_dir_all(&ctx.build_dir)?;
        self.run(&self.cmake, &configure_args(ctx), &ctx.build_dir)
    }

    fn build(&self, ctx: &ToolContext) -> Result<StepOutput> {
        self.run(&self.cmake, &build_args(ctx), &ctx.build_dir)
    }

    fn test(&self, ctx: &ToolContext) -> Result<StepOutput> {
        self.run(&self.ctest, &ctest_args(ctx), &ctx.build_dir)
    }

    fn install(&self, ctx: &ToolContext, prefix: &Path) -> Result<StepOutput> {
        self.run(&self.cmake, &install_args(ctx, prefix), &ctx.build_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(target: Option<&str>, jobs: Option<u32>) -> ToolContext {
        ToolContext {
            source_dir: PathBuf::from("/src/beauty"),
            build_dir: PathBuf::from("/src/beauty/build"),
            toolchain_file: PathBuf::from("/src/beauty/build/generators/toolchain.cmake"),
            build_type: BuildType::Release,
            target: target.map(str::to_string),
            jobs,
        }
    }

    #[test]
    fn test_step_output_into_failure() {
        let failure = StepOutput::failed(2, "missing header").into_failure("build");
        assert_eq!(failure.step, "build");
        assert_eq!(failure.status, Some(2));
        assert_eq!(failure.stderr, "missing header");
    }

    #[test]
    fn test_step_output_success() {
        assert!(StepOutput::ok("done").success());
        assert!(!StepOutput::failed(1, "").success());
        assert!(!StepOutput::default().success());
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_program_is_io_error() {
        let tool = CMakeTool::with_programs("/nonexistent/cmake", "/nonexistent/ctest");
        let dir = tempfile::tempdir().unwrap();
        let ctx = ToolContext {
            source_dir: dir.path().to_path_buf(),
            build_dir: dir.path().join("build"),
            toolchain_file: dir.path().join("toolchain.cmake"),
            build_type: BuildType::Release,
            target: None,
            jobs: None,
        };
        assert!(matches!(tool.build(&ctx), Err(Error::IoError(_))));
    }

    #[test]
    fn test_configure_args() {
        assert_eq!(
            configure_args(&ctx(None, None)),
            vec![
                "-S",
                "/src/beauty",
                "-B",
                "/src/beauty/build",
                "-DCMAKE_TOOLCHAIN_FILE=/src/beauty/build/generators/toolchain.cmake",
                "-DCMAKE_BUILD_TYPE=Release",
            ]
        );
    }

    #[test]
    fn test_build_args_default_target() {
        assert_eq!(
            build_args(&ctx(None, None)),
            vec!["--build", "/src/beauty/build", "--config", "Release"]
        );
    }

    #[test]
    fn test_build_args_with_target_and_jobs() {
        assert_eq!(
            build_args(&ctx(Some("beauty"), Some(8))),
            vec![
                "--build",
                "/src/beauty/build",
                "--config",
                "Release",
                "--target",
                "beauty",
                "--parallel",
                "8",
            ]
        );
    }

    #[test]
    fn test_ctest_args() {
        assert_eq!(
            ctest_args(&ctx(None, None)),
            vec![
                "--test-dir",
                "/src/beauty/build",
                "-C",
                "Release",
                "--output-on-failure",
            ]
        );
    }

    #[test]
    fn test_install_args() {
        assert_eq!(
            install_args(&ctx(Some("beauty"), None), Path::new("/pkg")),
            vec![
                "--install",
                "/src/beauty/build",
                "--config",
                "Release",
                "--prefix",
                "/pkg",
            ]
        );
    }
}

// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use sous::recipe::{BuildTool, RawOptions, StepOutput, ToolContext};
use sous::{parse_recipe_file, KitchenConfig, Recipe, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Example binaries the bundled recipe packages
pub const EXAMPLE_BINARIES: &[&str] = &["examples/beauty_server", "examples/beauty_client_sync"];

/// Load the bundled beauty recipe
pub fn beauty_recipe() -> Recipe {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("recipes/beauty.toml");
    parse_recipe_file(&path).unwrap()
}

/// Build a raw option map from `name=value` pairs
pub fn raw_options(pairs: &[(&str, &str)]) -> RawOptions {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Fake build tool with scripted step results
///
/// The build step produces example binaries only when the generated
/// toolchain file asks for them and the build is not restricted to a
/// single target. The install step lays down a typical library tree
/// including the build tool's config dir.
pub struct FakeTool {
    pub configure: StepOutput,
    pub build: StepOutput,
    pub test: StepOutput,
    pub install: StepOutput,
    pub calls: Mutex<Vec<String>>,
    /// Target each build step was restricted to
    pub targets: Mutex<Vec<Option<String>>>,
}

impl FakeTool {
    pub fn passing() -> Self {
        Self {
            configure: StepOutput::ok("-- Configuring done"),
            build: StepOutput::ok("[100%] Built target beauty"),
            test: StepOutput::ok("100% tests passed, 0 tests failed"),
            install: StepOutput::ok("-- Installing"),
            calls: Mutex::new(Vec::new()),
            targets: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn targets(&self) -> Vec<Option<String>> {
        self.targets.lock().unwrap().clone()
    }

    pub fn called(&self, step: &str) -> bool {
        self.calls().iter().any(|c| c == step)
    }

    fn record(&self, step: &str) {
        self.calls.lock().unwrap().push(step.to_string());
    }
}

impl BuildTool for FakeTool {
    fn name(&self) -> &str {
        "fake"
    }

    fn configure(&self, ctx: &ToolContext) -> Result<StepOutput> {
        self.record("configure");
        assert!(
            ctx.toolchain_file.is_file(),
            "toolchain file must exist before configure"
        );
        Ok(self.configure.clone())
    }

    fn build(&self, ctx: &ToolContext) -> Result<StepOutput> {
        self.record("build");
        self.targets.lock().unwrap().push(ctx.target.clone());
        let toolchain = fs::read_to_string(&ctx.toolchain_file)?;
        let examples_requested = toolchain.contains("BEAUTY_BUILD_EXAMPLES \"ON\"");
        if self.build.success() && examples_requested && ctx.target.is_none() {
            for binary in EXAMPLE_BINARIES {
                let path = ctx.build_dir.join(binary);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, "\x7fELF")?;
            }
        }
        Ok(self.build.clone())
    }

    fn test(&self, _ctx: &ToolContext) -> Result<StepOutput> {
        self.record("test");
        Ok(self.test.clone())
    }

    fn install(&self, _ctx: &ToolContext, prefix: &Path) -> Result<StepOutput> {
        self.record("install");
        if self.install.success() {
            fs::create_dir_all(prefix.join("include/beauty"))?;
            fs::write(prefix.join("include/beauty/beauty.hpp"), "#pragma once\n")?;
            fs::create_dir_all(prefix.join("lib/cmake/beauty"))?;
            fs::write(prefix.join("lib/libbeauty.a"), "!<arch>\n")?;
            fs::write(prefix.join("lib/cmake/beauty/beautyConfig.cmake"), "")?;
        }
        Ok(self.install.clone())
    }
}

/// A scratch source tree with a license file
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("beauty");
        fs::create_dir_all(source.join("include")).unwrap();
        fs::write(source.join("LICENSE"), "MIT License\n").unwrap();
        fs::write(source.join("CMakeLists.txt"), "project(beauty)\n").unwrap();
        Self { dir }
    }

    pub fn source_dir(&self) -> PathBuf {
        self.dir.path().join("beauty")
    }

    pub fn config(&self) -> KitchenConfig {
        KitchenConfig::new(
            &self.source_dir(),
            &self.dir.path().join("build"),
            &self.dir.path().join("package"),
        )
    }
}

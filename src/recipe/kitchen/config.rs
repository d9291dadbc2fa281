// src/recipe/kitchen/config.rs

//! Configuration and result types for the Kitchen

use crate::config::AmbientConfig;
use crate::error::EvaluationStatus;
use crate::recipe::consumer::ConsumerInfo;
use crate::recipe::generator::{GeneratedConfiguration, GENERATORS_DIR, TOOLCHAIN_FILE};
use crate::recipe::kitchen::orchestrator::BuildReport;
use crate::recipe::kitchen::packager::PackageLayout;
use crate::recipe::options::NormalizedOptions;
use crate::recipe::requirements::Requirement;
use crate::recipe::settings::Settings;
use std::path::{Path, PathBuf};

/// Where the Kitchen reads sources and writes its outputs
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Unpacked package sources
    pub source_dir: PathBuf,
    /// Build tool working directory, reused across runs
    pub build_dir: PathBuf,
    /// Root of the assembled package
    pub package_dir: PathBuf,
    /// Build-mode flags
    pub ambient: AmbientConfig,
}

impl KitchenConfig {
    pub fn new(source_dir: &Path, build_dir: &Path, package_dir: &Path) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            build_dir: build_dir.to_path_buf(),
            package_dir: package_dir.to_path_buf(),
            ambient: AmbientConfig::default(),
        }
    }

    /// Conventional `build/` and `package/` dirs next to the sources
    pub fn for_source(source_dir: &Path) -> Self {
        Self::new(
            source_dir,
            &source_dir.join("build"),
            &source_dir.join("package"),
        )
    }

    pub fn with_ambient(mut self, ambient: AmbientConfig) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn generators_dir(&self) -> PathBuf {
        self.build_dir.join(GENERATORS_DIR)
    }

    pub fn toolchain_file(&self) -> PathBuf {
        self.generators_dir().join(TOOLCHAIN_FILE)
    }
}

/// Everything computed for one configuration before the build tool runs
#[derive(Debug, Clone)]
pub struct Plan {
    pub settings: Settings,
    pub options: NormalizedOptions,
    pub requirements: Vec<Requirement>,
    pub generated: GeneratedConfiguration,
    pub consumer: ConsumerInfo,
}

/// Result of a successful evaluation
#[derive(Debug)]
pub struct Evaluation {
    pub plan: Plan,
    pub report: BuildReport,
    pub layout: PackageLayout,
}

impl Evaluation {
    pub fn status(&self) -> EvaluationStatus {
        EvaluationStatus::Success
    }

    /// Build log of the external tool steps
    pub fn log(&self) -> &str {
        &self.report.log
    }
}

// src/recipe/mod.rs

//! Recipe evaluation for C/C++ library packages
//!
//! A recipe declares a package's options, requirements, packaging rules
//! and what consumers need to link against it. Evaluating a recipe for a
//! given set of settings produces configuration for an external build
//! tool, drives that tool, assembles the package and publishes consumer
//! info.
//!
//! # Culinary Terminology
//!
//! - **Recipe**: the package description (like a recipe card)
//! - **Kitchen**: evaluates recipes with one build tool
//! - **Settings**: the target platform a recipe is evaluated for
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "beauty"
//! version = "1.0.0"
//! license = "BSD-2-Clause"
//!
//! [options]
//! shared = false
//! fPIC = true
//!
//! [options.openssl]
//! default = true
//! define = "BEAUTY_ENABLE_OPENSSL"
//!
//! [[requires]]
//! name = "boost"
//! version = "1.78.0"
//! transitive_headers = true
//!
//! [[requires]]
//! name = "openssl"
//! version = "1.1.1o"
//! when = "openssl"
//! transitive_headers = true
//! transitive_libs = true
//!
//! [package_info.system_libs]
//! Linux = ["pthread"]
//! Windows = ["crypt32"]
//! ```

pub mod consumer;
mod format;
pub mod generator;
pub mod kitchen;
pub mod options;
pub mod parser;
pub mod requirements;
pub mod settings;

pub use consumer::{publish, ConsumerInfo};
pub use format::{PackageInfo, PackageSection, PackagingSection, Recipe};
pub use generator::{emit, DependencyDescriptor, GeneratedConfiguration};
pub use kitchen::{
    BuildReport, BuildState, BuildTool, CMakeTool, CancellationToken, Evaluation, Kitchen,
    KitchenConfig, Plan, StepOutput, ToolContext, plan,
};
pub use options::{normalize, NormalizedOptions, OptionDecl, RawOptions};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
pub use requirements::{resolve, Requirement, RequirementDecl};
pub use settings::{BuildType, Os, Settings};

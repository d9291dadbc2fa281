// src/lib.rs

//! Sous: package recipe evaluation engine
//!
//! Turns a declarative package recipe plus a target configuration into
//! build-tool configuration, a build run, a packaged layout and consumer
//! metadata.
//!
//! # Architecture
//!
//! - Pure planning: option normalization, requirement resolution and
//!   configuration generation never touch the build tool
//! - One external tool behind the `BuildTool` trait, driven step by step
//! - Consumer info describes the contract and is independent of the build

pub mod config;
mod error;
pub mod recipe;
pub mod version;

pub use config::{AmbientConfig, TestPolicy};
pub use error::{Error, EvaluationStatus, Result, StepFailure};
pub use recipe::{
    parse_recipe, parse_recipe_file, validate_recipe, ConsumerInfo, Evaluation, Kitchen,
    KitchenConfig, Recipe, Settings,
};
pub use version::{Version, VersionConstraint};

// src/recipe/consumer.rs

//! Consumer info: what downstream recipes need to use this package
//!
//! Published metadata describes the contract, not the artifact, so it is
//! computed from the recipe, normalized options and settings alone and
//! never depends on whether a build ran.

use crate::error::Result;
use crate::recipe::format::Recipe;
use crate::recipe::options::NormalizedOptions;
use crate::recipe::settings::Settings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name used when consumer info is written next to a package
pub const CONSUMER_INFO_FILE: &str = "consumer-info.json";

/// Published consumption metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerInfo {
    pub libs: Vec<String>,
    pub include_dirs: Vec<String>,
    /// Name of the config file downstream tooling looks up
    pub cmake_file_name: String,
    /// Namespaced target name downstream tooling links against
    pub cmake_target_name: String,
    pub system_libs: Vec<String>,
    pub defines: Vec<String>,
}

impl ConsumerInfo {
    /// Write as pretty JSON into a package root
    pub fn write(&self, dir: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(dir.join(CONSUMER_INFO_FILE), json)?;
        Ok(())
    }
}

/// Compute consumer info for one configuration
pub fn publish(recipe: &Recipe, options: &NormalizedOptions, settings: &Settings) -> ConsumerInfo {
    let info = &recipe.package_info;

    // Own library and headers
    let libs = info.libs.clone();
    let include_dirs = info.include_dirs.clone();

    // Canonical lookup names, independent of the recipe name's casing
    let cmake_file_name = info
        .cmake_file_name
        .clone()
        .unwrap_or_else(|| recipe.package.name.clone());
    let cmake_target_name = info
        .cmake_target_name
        .clone()
        .unwrap_or_else(|| format!("{}::{}", cmake_file_name, cmake_file_name));

    // Platform ABI requirements of the networking stack
    let system_libs = info
        .system_libs
        .get(&settings.os)
        .cloned()
        .unwrap_or_default();

    let mut defines: Vec<String> = Vec::new();
    for decl in &recipe.options {
        if let Some(define) = &decl.define
            && options.is_enabled(&decl.name)
            && !defines.contains(define)
        {
            defines.push(define.clone());
        }
    }

    ConsumerInfo {
        libs,
        include_dirs,
        cmake_file_name,
        cmake_target_name,
        system_libs,
        defines,
    }
}

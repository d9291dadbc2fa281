// src/recipe/generator.rs

//! Generator: build-tool configuration emitted for one evaluation
//!
//! Emission is a pure function of the recipe, normalized options,
//! settings, resolved requirements and ambient flags. The result is
//! written as two files the external tool understands:
//!
//! - `toolchain.cmake`: one cache variable per entry, sorted by name
//! - `dependencies.json`: one descriptor per resolved requirement

use crate::config::AmbientConfig;
use crate::error::Result;
use crate::recipe::format::Recipe;
use crate::recipe::options::{NormalizedOptions, PIC_OPTION, SHARED_OPTION};
use crate::recipe::requirements::Requirement;
use crate::recipe::settings::Settings;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Subdirectory of the build dir holding generated files
pub const GENERATORS_DIR: &str = "generators";
pub const TOOLCHAIN_FILE: &str = "toolchain.cmake";
pub const DEPENDENCIES_FILE: &str = "dependencies.json";
const FINGERPRINT_FILE: &str = "generated.sha256";

/// Dependency descriptor handed to the build tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyDescriptor {
    pub name: String,
    pub reference: String,
    pub version: String,
    pub transitive_headers: bool,
    pub transitive_libs: bool,
}

impl From<&Requirement> for DependencyDescriptor {
    fn from(req: &Requirement) -> Self {
        Self {
            name: req.name.clone(),
            reference: req.reference(),
            version: req.version.to_string(),
            transitive_headers: req.transitive_headers,
            transitive_libs: req.transitive_libs,
        }
    }
}

/// Variables and dependency descriptors for the external tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedConfiguration {
    variables: BTreeMap<String, String>,
    dependencies: Vec<DependencyDescriptor>,
}

fn on_off(value: bool) -> String {
    let flag = if value { "ON" } else { "OFF" };
    flag.to_string()
}

/// Emit the generated configuration
pub fn emit(
    recipe: &Recipe,
    options: &NormalizedOptions,
    settings: &Settings,
    requirements: &[Requirement],
    ambient: &AmbientConfig,
) -> GeneratedConfiguration {
    let prefix = recipe.variable_prefix();
    let mut variables = BTreeMap::new();

    variables.insert("CMAKE_BUILD_TYPE".to_string(), settings.build_type.to_string());

    if let Some(shared) = options.get(SHARED_OPTION) {
        variables.insert("BUILD_SHARED_LIBS".to_string(), on_off(shared));
    }
    if let Some(pic) = options.get(PIC_OPTION) {
        variables.insert("CMAKE_POSITION_INDEPENDENT_CODE".to_string(), on_off(pic));
    }

    for decl in &recipe.options {
        if let (Some(define), Some(value)) = (&decl.define, options.get(&decl.name)) {
            variables.insert(define.clone(), on_off(value));
        }
    }

    variables.insert(
        format!("{}_BUILD_EXAMPLES", prefix),
        on_off(ambient.build_examples()),
    );
    variables.insert(format!("{}_BUILD_TESTS", prefix), on_off(ambient.run_tests()));

    let dependencies = requirements.iter().map(DependencyDescriptor::from).collect();

    GeneratedConfiguration {
        variables,
        dependencies,
    }
}

impl GeneratedConfiguration {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(|s| s.as_str())
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn dependencies(&self) -> &[DependencyDescriptor] {
        &self.dependencies
    }

    /// Render the toolchain file
    pub fn render_toolchain(&self) -> String {
        let mut out = String::from("# Generated by sous. Do not edit.\n");
        for (name, value) in &self.variables {
            let value = value.replace('\\', "\\\\").replace('"', "\\\"");
            out.push_str(&format!("set({} \"{}\" CACHE STRING \"\" FORCE)\n", name, value));
        }
        out
    }

    /// Render the dependency descriptor file
    pub fn render_dependencies(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&self.dependencies)?;
        json.push('\n');
        Ok(json)
    }

    /// Stable hash over everything written to disk
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(self.render_toolchain().as_bytes());
        hasher.update(self.render_dependencies()?.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    /// Write generated files into `dir`
    ///
    /// Files are left untouched when their content has not changed since
    /// the previous run, so the build tool can reuse its intermediate
    /// state. Returns whether anything was written.
    pub fn write(&self, dir: &Path) -> Result<bool> {
        fs::create_dir_all(dir)?;

        let fingerprint = self.fingerprint()?;
        let fingerprint_path = dir.join(FINGERPRINT_FILE);
        let unchanged = fs::read_to_string(&fingerprint_path)
            .map(|previous| previous.trim() == fingerprint)
            .unwrap_or(false);

        if unchanged
            && dir.join(TOOLCHAIN_FILE).is_file()
            && dir.join(DEPENDENCIES_FILE).is_file()
        {
            debug!("Generated files in {} are up to date", dir.display());
            return Ok(false);
        }

        fs::write(dir.join(TOOLCHAIN_FILE), self.render_toolchain())?;
        fs::write(dir.join(DEPENDENCIES_FILE), self.render_dependencies()?)?;
        fs::write(&fingerprint_path, format!("{}\n", fingerprint))?;

        info!(
            "Wrote {} variable(s) and {} dependency descriptor(s) to {}",
            self.variables.len(),
            self.dependencies.len(),
            dir.display()
        );
        Ok(true)
    }
}

// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::format::{Recipe, RecipeFile};
use crate::recipe::options::{PIC_OPTION, SHARED_OPTION};
use std::collections::HashSet;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    let file: RecipeFile = toml::from_str(content)
        .map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))?;
    file.into_recipe()
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Hard errors are returned as `Err`; soft problems come back as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::ParseError("Recipe package version cannot be empty".to_string()));
    }

    let mut defines = HashSet::new();
    for option in &recipe.options {
        if let Some(define) = &option.define
            && !defines.insert(define.as_str())
        {
            return Err(Error::ParseError(format!(
                "Define '{}' is gated by more than one option",
                define
            )));
        }
    }

    if recipe.option(PIC_OPTION).is_some() && recipe.option(SHARED_OPTION).is_none() {
        warnings.push(format!(
            "Option '{}' declared without '{}'",
            PIC_OPTION, SHARED_OPTION
        ));
    }

    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.packaging.license_files.is_empty() {
        warnings.push("No license files listed for packaging".to_string());
    }

    let mut seen = HashSet::new();
    for req in &recipe.requires {
        if req.when.is_none() && !seen.insert(req.name.as_str()) {
            warnings.push(format!(
                "Requirement '{}' declared more than once; first declaration wins",
                req.name
            ));
        }
    }

    Ok(warnings)
}

// src/commands/mod.rs
//! Command handlers for the sous CLI

mod evaluate;
mod generate;
mod info;

pub use evaluate::{cmd_evaluate, EvaluateDirs, EvaluateFlags};
pub use generate::cmd_generate;
pub use info::cmd_info;

use crate::cli::RecipeArgs;
use anyhow::{Context, Result};
use sous::recipe::options::parse_assignment;
use sous::recipe::RawOptions;
use sous::{parse_recipe_file, validate_recipe, Recipe, Settings};
use std::path::Path;

/// Everything a command needs to evaluate one recipe
pub(crate) struct Selection {
    pub recipe: Recipe,
    pub raw: RawOptions,
    pub settings: Settings,
}

/// Parse and validate the recipe, options and settings from CLI arguments
pub(crate) fn load_selection(args: &RecipeArgs) -> Result<Selection> {
    let recipe_path = Path::new(&args.recipe);
    let recipe = parse_recipe_file(recipe_path)
        .with_context(|| format!("Failed to parse recipe: {}", recipe_path.display()))?;

    let warnings = validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;
    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut raw = RawOptions::new();
    for assignment in &args.options {
        let (name, value) = parse_assignment(assignment)?;
        raw.insert(name, value);
    }

    let mut settings = Settings::detect().context("Failed to detect host settings")?;
    for assignment in &args.settings {
        settings
            .apply(assignment)
            .with_context(|| format!("Invalid setting: {}", assignment))?;
    }

    Ok(Selection {
        recipe,
        raw,
        settings,
    })
}

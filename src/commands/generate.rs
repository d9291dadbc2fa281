// src/commands/generate.rs

//! Generate command - write build tool configuration without building

use super::load_selection;
use crate::cli::RecipeArgs;
use anyhow::{Context, Result};
use sous::recipe::generator::GENERATORS_DIR;
use sous::recipe::plan;
use sous::AmbientConfig;
use std::path::Path;

pub fn cmd_generate(args: &RecipeArgs, ambient: &AmbientConfig, build_dir: &str) -> Result<()> {
    let selection = load_selection(args)?;
    let plan = plan(&selection.recipe, &selection.raw, &selection.settings, ambient)?;

    let out_dir = Path::new(build_dir).join(GENERATORS_DIR);
    let written = plan
        .generated
        .write(&out_dir)
        .with_context(|| format!("Failed to write generated files to {}", out_dir.display()))?;

    if written {
        println!("Generated files written to {}", out_dir.display());
    } else {
        println!("Generated files in {} are up to date", out_dir.display());
    }
    println!(
        "  {} variable(s), {} dependency descriptor(s)",
        plan.generated.variables().len(),
        plan.generated.dependencies().len()
    );

    Ok(())
}

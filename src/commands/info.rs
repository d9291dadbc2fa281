// src/commands/info.rs

//! Info command - show what an evaluation would produce

use super::load_selection;
use crate::cli::RecipeArgs;
use anyhow::{Context, Result};
use sous::recipe::plan;
use sous::AmbientConfig;

/// Print normalized options, requirements and consumer info
pub fn cmd_info(args: &RecipeArgs, ambient: &AmbientConfig, json: bool) -> Result<()> {
    let selection = load_selection(args)?;
    let recipe = &selection.recipe;
    let plan = plan(recipe, &selection.raw, &selection.settings, ambient)?;

    if json {
        let out = serde_json::to_string_pretty(&plan.consumer)
            .context("Failed to serialize consumer info")?;
        println!("{}", out);
        return Ok(());
    }

    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);
    if let Some(description) = &recipe.package.description {
        println!("  {}", description);
    }
    println!("Settings: {}", plan.settings);

    println!();
    println!("Options:");
    for (name, value) in plan.options.iter() {
        println!("  {} = {}", name, value);
    }
    for name in plan.options.removed() {
        println!("  {} (removed)", name);
    }

    println!();
    println!("Requirements:");
    if plan.requirements.is_empty() {
        println!("  (none)");
    }
    for req in &plan.requirements {
        let mut flags = Vec::new();
        if req.transitive_headers {
            flags.push("transitive_headers");
        }
        if req.transitive_libs {
            flags.push("transitive_libs");
        }
        if flags.is_empty() {
            println!("  {}", req.reference());
        } else {
            println!("  {} [{}]", req.reference(), flags.join(", "));
        }
    }

    let consumer = &plan.consumer;
    println!();
    println!("Consumer info:");
    println!("  target:      {}", consumer.cmake_target_name);
    println!("  file name:   {}", consumer.cmake_file_name);
    println!("  libs:        {}", consumer.libs.join(" "));
    println!("  includedirs: {}", consumer.include_dirs.join(" "));
    if !consumer.system_libs.is_empty() {
        println!("  system libs: {}", consumer.system_libs.join(" "));
    }
    if !consumer.defines.is_empty() {
        println!("  defines:     {}", consumer.defines.join(" "));
    }

    Ok(())
}

// src/cli/mod.rs
//! CLI definitions for sous
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `info` - Show the evaluated configuration without building
//! - `generate` - Write build tool configuration only
//! - `evaluate` - Configure, build, test and package a recipe
//! - `completions` - Generate shell completion scripts

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use sous::TestPolicy;

#[derive(Parser)]
#[command(name = "sous")]
#[command(author = "Sous Project")]
#[command(version)]
#[command(about = "Package recipe evaluation engine", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the ambient configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Recipe and configuration selection shared by all commands
#[derive(Args, Debug, Clone)]
pub struct RecipeArgs {
    /// Path to the recipe file
    pub recipe: String,

    /// Option selection, e.g. `-o shared=True` (repeatable)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Setting override, e.g. `-s os=Windows` (repeatable; defaults to the host)
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show normalized options, requirements and consumer info
    Info {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Print consumer info as JSON only
        #[arg(long)]
        json: bool,
    },

    /// Write generated build tool configuration
    Generate {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Build directory (generated files go into its `generators/`)
        #[arg(short, long, default_value = "build")]
        build_dir: String,
    },

    /// Configure, build, test and package a recipe
    Evaluate {
        #[command(flatten)]
        recipe: RecipeArgs,

        /// Source directory (default: directory containing the recipe)
        #[arg(long)]
        source_dir: Option<String>,

        /// Build directory (default: <source>/build)
        #[arg(short, long)]
        build_dir: Option<String>,

        /// Package output directory (default: <source>/package)
        #[arg(short, long)]
        package_dir: Option<String>,

        /// Do not run the test step
        #[arg(long)]
        skip_tests: bool,

        /// Do not build or package examples
        #[arg(long)]
        skip_examples: bool,

        /// What a failing test step means: abort or warn
        #[arg(long)]
        test_policy: Option<TestPolicy>,

        /// Number of parallel build jobs
        #[arg(short, long)]
        jobs: Option<u32>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

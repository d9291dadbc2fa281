// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use sous::AmbientConfig;
use std::path::Path;
use std::process::ExitCode;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{EvaluateDirs, EvaluateFlags};

/// Exit code for an error chain, per evaluation status
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<sous::Error>())
        .and_then(|e| e.status())
        .map(|status| status.exit_code() as u8)
        .unwrap_or(1)
}

fn run(cli: Cli) -> Result<()> {
    let ambient = AmbientConfig::load(cli.config.as_deref().map(Path::new))?;

    match cli.command {
        Commands::Info { recipe, json } => commands::cmd_info(&recipe, &ambient, json),
        Commands::Generate { recipe, build_dir } => {
            commands::cmd_generate(&recipe, &ambient, &build_dir)
        }
        Commands::Evaluate {
            recipe,
            source_dir,
            build_dir,
            package_dir,
            skip_tests,
            skip_examples,
            test_policy,
            jobs,
        } => {
            let dirs = EvaluateDirs {
                source_dir: source_dir.as_deref(),
                build_dir: build_dir.as_deref(),
                package_dir: package_dir.as_deref(),
            };
            let flags = EvaluateFlags {
                skip_tests,
                skip_examples,
                test_policy,
                jobs,
            };
            commands::cmd_evaluate(&recipe, ambient, &dirs, &flags)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "sous", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe file
fn recipe_arg() -> Arg {
    Arg::new("recipe").required(true).help("Path to the recipe file")
}

/// Common argument: option selection
fn option_arg() -> Arg {
    Arg::new("option")
        .short('o')
        .long("option")
        .value_name("NAME=VALUE")
        .action(ArgAction::Append)
        .help("Option selection, e.g. -o shared=True")
}

/// Common argument: setting override
fn setting_arg() -> Arg {
    Arg::new("setting")
        .short('s')
        .long("setting")
        .value_name("KEY=VALUE")
        .action(ArgAction::Append)
        .help("Setting override, e.g. -s os=Windows (defaults to the host)")
}

fn build_cli() -> Command {
    Command::new("sous")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Sous Contributors")
        .about("Package recipe evaluation engine")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable debug logging (overrides RUST_LOG)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to the ambient configuration file"),
        )
        .subcommand(
            Command::new("info")
                .about("Show normalized options, requirements and consumer info")
                .arg(recipe_arg())
                .arg(option_arg())
                .arg(setting_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print consumer info as JSON only"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Write generated build tool configuration")
                .arg(recipe_arg())
                .arg(option_arg())
                .arg(setting_arg())
                .arg(
                    Arg::new("build_dir")
                        .short('b')
                        .long("build-dir")
                        .default_value("build")
                        .help("Build directory (generated files go into its generators/)"),
                ),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Configure, build, test and package a recipe")
                .arg(recipe_arg())
                .arg(option_arg())
                .arg(setting_arg())
                .arg(Arg::new("source_dir").long("source-dir").help("Source directory"))
                .arg(Arg::new("build_dir").short('b').long("build-dir").help("Build directory"))
                .arg(
                    Arg::new("package_dir")
                        .short('p')
                        .long("package-dir")
                        .help("Package output directory"),
                )
                .arg(
                    Arg::new("skip_tests")
                        .long("skip-tests")
                        .action(ArgAction::SetTrue)
                        .help("Do not run the test step"),
                )
                .arg(
                    Arg::new("skip_examples")
                        .long("skip-examples")
                        .action(ArgAction::SetTrue)
                        .help("Do not build or package examples"),
                )
                .arg(
                    Arg::new("test_policy")
                        .long("test-policy")
                        .value_parser(["abort", "warn"])
                        .help("What a failing test step means"),
                )
                .arg(Arg::new("jobs").short('j').long("jobs").help("Number of parallel build jobs")),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("sous.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}

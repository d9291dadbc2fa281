// src/recipe/kitchen/packager.rs

//! Package assembly after a successful build
//!
//! The package root only ever contains what consumers need: headers,
//! libraries, license texts and (optionally) example binaries. The build
//! tool's own config-lookup directory is pruned so consumers go through
//! the published consumer info instead.

use crate::error::{Error, Result};
use crate::recipe::consumer::{ConsumerInfo, CONSUMER_INFO_FILE};
use crate::recipe::format::PackagingSection;
use crate::recipe::kitchen::tool::{BuildTool, ToolContext};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const LICENSES_DIR: &str = "licenses";
pub const EXAMPLES_DIR: &str = "examples";

/// Resulting on-disk layout of a package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageLayout {
    pub root: PathBuf,
    pub include_dir: Option<PathBuf>,
    pub lib_dir: Option<PathBuf>,
    pub bin_dir: Option<PathBuf>,
    /// License files, relative to the root
    pub licenses: Vec<PathBuf>,
    /// Example binaries, relative to the root
    pub examples: Vec<PathBuf>,
    /// Every file in the package, relative to the root
    pub files: Vec<PathBuf>,
}

/// Assembles the package layout from build outputs
pub struct Packager<'a> {
    tool: &'a dyn BuildTool,
    packaging: &'a PackagingSection,
    include_examples: bool,
    consumer: Option<&'a ConsumerInfo>,
}

impl<'a> Packager<'a> {
    pub fn new(tool: &'a dyn BuildTool, packaging: &'a PackagingSection) -> Self {
        Self {
            tool,
            packaging,
            include_examples: true,
            consumer: None,
        }
    }

    /// Whether examples were built and should be packaged
    pub fn include_examples(mut self, include: bool) -> Self {
        self.include_examples = include;
        self
    }

    /// Write consumer info as the last assembly step
    pub fn consumer_info(mut self, info: &'a ConsumerInfo) -> Self {
        self.consumer = Some(info);
        self
    }

    /// Assemble the package under `root`
    ///
    /// Every failure reports as [`Error::PackagingError`]. On any error the
    /// partially assembled root is removed.
    pub fn package(&self, root: &Path, ctx: &ToolContext) -> Result<PackageLayout> {
        prepare_root(root).map_err(|e| packaging_error("prepare package root", e))?;

        match self.assemble(root, ctx) {
            Ok(layout) => Ok(layout),
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(root) {
                    warn!("Failed to clean up {}: {}", root.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    fn assemble(&self, root: &Path, ctx: &ToolContext) -> Result<PackageLayout> {
        let licenses = self
            .copy_licenses(&ctx.source_dir, root)
            .map_err(|e| packaging_error("copy licenses", e))?;

        info!("Installing into {}", root.display());
        let output = self
            .tool
            .install(ctx, root)
            .map_err(|e| packaging_error("install", e))?;
        if !output.success() {
            return Err(Error::PackagingError(
                output.into_failure("install").to_string(),
            ));
        }

        for dir in &self.packaging.prune_dirs {
            let path = root.join(dir);
            if path.exists() {
                debug!("Pruning {}", path.display());
                fs::remove_dir_all(&path)
                    .map_err(|e| packaging_error(&format!("prune {}", dir), e.into()))?;
            }
        }

        let examples = if self.include_examples {
            self.copy_examples(&ctx.build_dir, root)
                .map_err(|e| packaging_error("copy examples", e))?
        } else {
            Vec::new()
        };

        if let Some(consumer) = self.consumer {
            consumer
                .write(root)
                .map_err(|e| packaging_error("write consumer info", e))?;
        }

        let layout = scan_layout(root, licenses, examples)
            .map_err(|e| packaging_error("scan package", e))?;
        info!(
            "Packaged {} file(s) into {}",
            layout.files.len(),
            root.display()
        );
        Ok(layout)
    }

    /// Copy files in the source dir matching the license patterns
    fn copy_licenses(&self, source_dir: &Path, root: &Path) -> Result<Vec<PathBuf>> {
        let mut patterns = Vec::new();
        for pattern in &self.packaging.license_files {
            let compiled = Pattern::new(pattern).map_err(|e| {
                Error::PackagingError(format!("Invalid license pattern '{}': {}", pattern, e))
            })?;
            patterns.push(compiled);
        }

        // Only descend as deep as the deepest pattern reaches
        let depth = self
            .packaging
            .license_files
            .iter()
            .map(|p| p.split('/').count())
            .max()
            .unwrap_or(1);

        let mut matches = Vec::new();
        for entry in WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(depth)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(source_dir) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            if patterns.iter().any(|p| p.matches(&relative)) {
                matches.push(entry.path().to_path_buf());
            }
        }

        if matches.is_empty() {
            return Err(Error::PackagingError(format!(
                "No license files matching {:?} in {}",
                self.packaging.license_files,
                source_dir.display()
            )));
        }

        matches.sort();
        let dest_dir = root.join(LICENSES_DIR);
        fs::create_dir_all(&dest_dir)?;

        let mut copied = Vec::new();
        for path in matches {
            let Some(name) = path.file_name() else {
                continue;
            };
            fs::copy(&path, dest_dir.join(name))?;
            copied.push(Path::new(LICENSES_DIR).join(name));
        }
        Ok(copied)
    }

    /// Copy example binaries from the build dir
    fn copy_examples(&self, build_dir: &Path, root: &Path) -> Result<Vec<PathBuf>> {
        if self.packaging.example_binaries.is_empty() {
            return Ok(Vec::new());
        }

        let dest_dir = root.join(EXAMPLES_DIR);
        fs::create_dir_all(&dest_dir)?;

        let mut copied = Vec::new();
        for binary in &self.packaging.example_binaries {
            let source = find_binary(build_dir, binary).ok_or_else(|| {
                Error::PackagingError(format!(
                    "Example binary '{}' not found in {}",
                    binary,
                    build_dir.display()
                ))
            })?;
            let Some(name) = source.file_name() else {
                continue;
            };
            fs::copy(&source, dest_dir.join(name))?;
            copied.push(Path::new(EXAMPLES_DIR).join(name));
        }
        Ok(copied)
    }
}

/// Report a failure during assembly as a packaging error
///
/// Explicit packaging errors keep their message; anything else is
/// prefixed with the step it happened in.
fn packaging_error(step: &str, e: Error) -> Error {
    match e {
        Error::PackagingError(_) => e,
        other => Error::PackagingError(format!("{}: {}", step, other)),
    }
}

/// Remove a package left by an earlier evaluation
///
/// Only a root holding consumer info is removed, anything else is left
/// for [`Packager::package`] to refuse.
pub fn discard_previous(root: &Path) -> Result<()> {
    if root.join(CONSUMER_INFO_FILE).is_file() {
        debug!("Discarding previous package in {}", root.display());
        fs::remove_dir_all(root)
            .map_err(|e| packaging_error("discard previous package", e.into()))?;
    }
    Ok(())
}

/// Make sure the root is empty before assembly
///
/// A previous package (recognised by its consumer info) is replaced. Any
/// other non-empty directory is left alone and reported.
fn prepare_root(root: &Path) -> Result<()> {
    if root.exists() {
        let non_empty = fs::read_dir(root)?.next().is_some();
        if non_empty {
            if !root.join(CONSUMER_INFO_FILE).is_file() {
                return Err(Error::PackagingError(format!(
                    "Package root {} is not empty and does not hold a previous package",
                    root.display()
                )));
            }
            debug!("Replacing previous package in {}", root.display());
            fs::remove_dir_all(root)?;
        }
    }
    fs::create_dir_all(root)?;
    Ok(())
}

fn find_binary(build_dir: &Path, binary: &str) -> Option<PathBuf> {
    let plain = build_dir.join(binary);
    if plain.is_file() {
        return Some(plain);
    }
    let suffix = std::env::consts::EXE_SUFFIX;
    if !suffix.is_empty() {
        let with_suffix = build_dir.join(format!("{}{}", binary, suffix));
        if with_suffix.is_file() {
            return Some(with_suffix);
        }
    }
    None
}

fn scan_layout(root: &Path, licenses: Vec<PathBuf>, examples: Vec<PathBuf>) -> Result<PackageLayout> {
    let existing = |name: &str| {
        let dir = root.join(name);
        dir.is_dir().then_some(dir)
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(|e| Error::IoError(e.to_string()))?;
        if entry.file_type().is_file() || entry.file_type().is_symlink() {
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }
    }
    files.sort();

    Ok(PackageLayout {
        root: root.to_path_buf(),
        include_dir: existing("include"),
        lib_dir: existing("lib"),
        bin_dir: existing("bin"),
        licenses,
        examples,
        files,
    })
}

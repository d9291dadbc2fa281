// src/recipe/format.rs

//! Recipe model and the TOML file format it is read from
//!
//! The evaluation rules only ever see [`Recipe`]. Everything about how a
//! recipe file spells things (field names that drifted between recipe
//! generations, shorthand option tables, OS keys) is absorbed by the
//! private `RecipeFile` schema and its conversion in this module.

use crate::error::{Error, Result};
use crate::recipe::options::{OptionDecl, PIC_OPTION};
use crate::recipe::requirements::RequirementDecl;
use crate::recipe::settings::Os;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// Build-tool config directory removed from every package
pub const DEFAULT_PRUNE_DIR: &str = "lib/cmake";

/// A complete, normalized recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub package: PackageSection,
    /// Declared options, in declaration order
    pub options: Vec<OptionDecl>,
    /// Declared requirements, in declaration order
    pub requires: Vec<RequirementDecl>,
    pub package_info: PackageInfo,
    pub packaging: PackagingSection,
}

impl Recipe {
    /// Prefix for generated build variables (`beauty` → `BEAUTY`)
    pub fn variable_prefix(&self) -> String {
        self.package
            .name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Look up an option declaration by name
    pub fn option(&self, name: &str) -> Option<&OptionDecl> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// Package metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSection {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "homepage")]
    pub url: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    /// Build only this target instead of the default one
    #[serde(default)]
    pub build_target: Option<String>,
}

/// How consumers use the package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub libs: Vec<String>,
    pub include_dirs: Vec<String>,
    pub cmake_file_name: Option<String>,
    pub cmake_target_name: Option<String>,
    pub system_libs: HashMap<Os, Vec<String>>,
}

/// Packaging instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingSection {
    /// Glob patterns (relative to the source dir) of license files
    #[serde(default = "default_license_files", alias = "licenses")]
    pub license_files: Vec<String>,
    /// Example binaries (relative to the build dir) copied when examples are built
    #[serde(default)]
    pub example_binaries: Vec<String>,
    /// Directories removed from the final layout
    #[serde(default = "default_prune_dirs")]
    pub prune_dirs: Vec<String>,
}

impl Default for PackagingSection {
    fn default() -> Self {
        Self {
            license_files: default_license_files(),
            example_binaries: Vec::new(),
            prune_dirs: default_prune_dirs(),
        }
    }
}

fn default_license_files() -> Vec<String> {
    vec!["LICENSE*".to_string()]
}

fn default_prune_dirs() -> Vec<String> {
    vec![DEFAULT_PRUNE_DIR.to_string()]
}

// ---------------------------------------------------------------------------
// File schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct RecipeFile {
    package: PackageSection,
    #[serde(default, alias = "default_options")]
    options: BTreeMap<String, OptionEntry>,
    #[serde(default, alias = "requirements")]
    requires: Vec<RequirementDecl>,
    #[serde(default, alias = "cpp_info")]
    package_info: PackageInfoFile,
    #[serde(default)]
    packaging: PackagingSection,
    /// Declaration order of options; TOML tables are unordered once parsed
    #[serde(default)]
    option_order: Vec<String>,
}

/// `shared = false` or `[options.openssl] default = true, define = "..."`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OptionEntry {
    Default(bool),
    Full {
        default: bool,
        #[serde(default)]
        define: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
struct PackageInfoFile {
    #[serde(default)]
    libs: Vec<String>,
    #[serde(default, alias = "includedirs")]
    include_dirs: Vec<String>,
    #[serde(default)]
    cmake_file_name: Option<String>,
    #[serde(default)]
    cmake_target_name: Option<String>,
    #[serde(default, alias = "syslibs")]
    system_libs: BTreeMap<String, Vec<String>>,
}

/// Canonical spelling of option names that drifted between recipe versions
fn canonical_option_name(name: &str) -> String {
    if name.eq_ignore_ascii_case("fpic") {
        PIC_OPTION.to_string()
    } else {
        name.to_string()
    }
}

impl RecipeFile {
    pub(crate) fn into_recipe(self) -> Result<Recipe> {
        let mut options: Vec<OptionDecl> = self
            .options
            .into_iter()
            .map(|(name, entry)| {
                let name = canonical_option_name(&name);
                match entry {
                    OptionEntry::Default(default) => OptionDecl::new(name, default),
                    OptionEntry::Full {
                        default,
                        define,
                        description,
                    } => OptionDecl {
                        name,
                        default,
                        define,
                        description,
                    },
                }
            })
            .collect();

        if !self.option_order.is_empty() {
            let order: Vec<String> = self
                .option_order
                .iter()
                .map(|n| canonical_option_name(n))
                .collect();
            options.sort_by_key(|o| order.iter().position(|n| *n == o.name).unwrap_or(usize::MAX));
        }

        let mut requires = self.requires;
        for req in &mut requires {
            if let Some(when) = req.when.take() {
                req.when = Some(canonical_option_name(&when));
            }
            if let Some(when) = &req.when
                && !options.iter().any(|o| &o.name == when)
            {
                return Err(Error::ParseError(format!(
                    "Requirement '{}' depends on undeclared option '{}'",
                    req.name, when
                )));
            }
        }

        let mut system_libs = HashMap::new();
        for (os, libs) in self.package_info.system_libs {
            let os = Os::from_str(&os)
                .map_err(|_| Error::ParseError(format!("Unknown OS '{}' in system_libs", os)))?;
            system_libs.insert(os, libs);
        }

        let include_dirs = if self.package_info.include_dirs.is_empty() {
            vec!["include".to_string()]
        } else {
            self.package_info.include_dirs
        };

        let libs = if self.package_info.libs.is_empty() {
            vec![self.package.name.clone()]
        } else {
            self.package_info.libs
        };

        Ok(Recipe {
            package: self.package,
            options,
            requires,
            package_info: PackageInfo {
                libs,
                include_dirs,
                cmake_file_name: self.package_info.cmake_file_name,
                cmake_target_name: self.package_info.cmake_target_name,
                system_libs,
            },
            packaging: self.packaging,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Recipe> {
        let file: RecipeFile = toml::from_str(content)?;
        file.into_recipe()
    }

    #[test]
    fn test_shorthand_and_full_options() {
        let recipe = parse(
            r#"
[package]
name = "beauty"
version = "1.0.0"

[options]
shared = false
fpic = true

[options.openssl]
default = true
define = "BEAUTY_ENABLE_OPENSSL"
"#,
        )
        .unwrap();

        assert_eq!(recipe.options.len(), 3);
        assert!(recipe.option("fPIC").is_some());
        assert_eq!(
            recipe.option("openssl").unwrap().define.as_deref(),
            Some("BEAUTY_ENABLE_OPENSSL")
        );
        assert_eq!(recipe.package_info.libs, vec!["beauty"]);
        assert_eq!(recipe.package_info.include_dirs, vec!["include"]);
        assert_eq!(recipe.packaging.prune_dirs, vec!["lib/cmake"]);
    }

    #[test]
    fn test_drifted_field_names() {
        let recipe = parse(
            r#"
option_order = ["shared", "fPIC"]

[package]
name = "beauty"
version = "1.0.0"
homepage = "https://github.com/dfleury2/beauty"

[default_options]
shared = false
fPIC = true

[[requirements]]
name = "boost"
version = "1.78.0"

[cpp_info]
includedirs = ["include"]

[cpp_info.syslibs]
linux = ["pthread"]
windows = ["crypt32"]
"#,
        )
        .unwrap();

        assert_eq!(
            recipe.package.url.as_deref(),
            Some("https://github.com/dfleury2/beauty")
        );
        let names: Vec<_> = recipe.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["shared", "fPIC"]);
        assert_eq!(recipe.requires[0].name, "boost");
        assert_eq!(recipe.package_info.system_libs[&Os::Linux], vec!["pthread"]);
        assert_eq!(recipe.package_info.system_libs[&Os::Windows], vec!["crypt32"]);
    }

    #[test]
    fn test_requirement_on_undeclared_option() {
        let err = parse(
            r#"
[package]
name = "beauty"
version = "1.0.0"

[[requires]]
name = "openssl"
version = "1.1.1o"
when = "tls"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("undeclared option 'tls'"));
    }

    #[test]
    fn test_unknown_system_lib_os() {
        assert!(
            parse(
                r#"
[package]
name = "beauty"
version = "1.0.0"

[package_info.system_libs]
beos = ["be"]
"#,
            )
            .is_err()
        );
    }

    #[test]
    fn test_variable_prefix() {
        let recipe = parse(
            r#"
[package]
name = "my-lib"
version = "0.1"
"#,
        )
        .unwrap();
        assert_eq!(recipe.variable_prefix(), "MY_LIB");
    }
}

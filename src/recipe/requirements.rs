// src/recipe/requirements.rs

//! Requirements resolver
//!
//! Turns the recipe's requirement declarations into the ordered set of
//! dependencies for one option/settings combination. Declarations without
//! a governing option are mandatory; the rest are included only when
//! their option is enabled.

use crate::recipe::options::NormalizedOptions;
use crate::recipe::settings::Settings;
use crate::version::VersionConstraint;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A dependency as declared by the recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementDecl {
    pub name: String,
    pub version: VersionConstraint,
    /// Option that must be enabled for this requirement to apply
    #[serde(default)]
    pub when: Option<String>,
    /// Headers are visible through this package's public headers
    #[serde(default)]
    pub transitive_headers: bool,
    /// Symbols must be linked by this package's consumers
    #[serde(default)]
    pub transitive_libs: bool,
}

impl RequirementDecl {
    pub fn new(name: impl Into<String>, version: VersionConstraint) -> Self {
        Self {
            name: name.into(),
            version,
            when: None,
            transitive_headers: false,
            transitive_libs: false,
        }
    }

    /// Gate this requirement on an option
    pub fn when(mut self, option: impl Into<String>) -> Self {
        self.when = Some(option.into());
        self
    }

    pub fn transitive(mut self, headers: bool, libs: bool) -> Self {
        self.transitive_headers = headers;
        self.transitive_libs = libs;
        self
    }

    fn applies(&self, options: &NormalizedOptions) -> bool {
        match &self.when {
            Some(option) => options.is_enabled(option),
            None => true,
        }
    }
}

/// A resolved dependency requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub version: VersionConstraint,
    pub transitive_headers: bool,
    pub transitive_libs: bool,
}

impl Requirement {
    /// Reference string understood by dependency fetchers (`boost/1.78.0`)
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl From<&RequirementDecl> for Requirement {
    fn from(decl: &RequirementDecl) -> Self {
        Self {
            name: decl.name.clone(),
            version: decl.version.clone(),
            transitive_headers: decl.transitive_headers,
            transitive_libs: decl.transitive_libs,
        }
    }
}

/// Resolve the requirement set for one configuration
///
/// Declaration order is preserved. If a name is declared more than once,
/// the first applicable declaration wins.
pub fn resolve(
    decls: &[RequirementDecl],
    options: &NormalizedOptions,
    settings: &Settings,
) -> Vec<Requirement> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for decl in decls {
        if !decl.applies(options) {
            debug!(
                "Skipping requirement {} (option {} disabled)",
                decl.name,
                decl.when.as_deref().unwrap_or_default()
            );
            continue;
        }

        if !seen.insert(decl.name.as_str()) {
            debug!("Dropping duplicate requirement {}", decl.name);
            continue;
        }

        resolved.push(Requirement::from(decl));
    }

    debug!(
        "Resolved {} requirement(s) for {}: {}",
        resolved.len(),
        settings,
        resolved
            .iter()
            .map(|r| r.reference())
            .collect::<Vec<_>>()
            .join(", ")
    );

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::options::{normalize, OptionDecl, RawOptions};
    use crate::recipe::settings::{BuildType, Os};

    fn decls() -> Vec<RequirementDecl> {
        vec![
            RequirementDecl::new("boost", VersionConstraint::parse("1.78.0").unwrap())
                .transitive(true, false),
            RequirementDecl::new("openssl", VersionConstraint::parse("1.1.1o").unwrap())
                .when("openssl")
                .transitive(true, true),
        ]
    }

    fn options(openssl: &str) -> NormalizedOptions {
        let decls = vec![OptionDecl::new("openssl", true)];
        let raw: RawOptions = [("openssl".to_string(), openssl.to_string())].into();
        normalize(&decls, &raw, &settings()).unwrap()
    }

    fn settings() -> Settings {
        Settings::new(Os::Linux, "gcc", BuildType::Release, "x86_64")
    }

    #[test]
    fn test_tls_enabled_includes_openssl_once() {
        let resolved = resolve(&decls(), &options("True"), &settings());
        let names: Vec<_> = resolved.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["boost", "openssl"]);

        let openssl: Vec<_> = resolved.iter().filter(|r| r.name == "openssl").collect();
        assert_eq!(openssl.len(), 1);
        assert!(openssl[0].transitive_headers);
        assert!(openssl[0].transitive_libs);
    }

    #[test]
    fn test_tls_disabled_omits_openssl() {
        let resolved = resolve(&decls(), &options("False"), &settings());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "boost");
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut decls = decls();
        decls.push(RequirementDecl::new(
            "boost",
            VersionConstraint::parse(">=1.80").unwrap(),
        ));
        let resolved = resolve(&decls, &options("False"), &settings());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].reference(), "boost/1.78.0");
    }

    #[test]
    fn test_disabled_duplicate_does_not_shadow() {
        let decls = vec![
            RequirementDecl::new("openssl", VersionConstraint::parse("1.1.1o").unwrap())
                .when("openssl"),
            RequirementDecl::new("openssl", VersionConstraint::parse(">=3.0").unwrap()),
        ];
        let resolved = resolve(&decls, &options("False"), &settings());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].reference(), "openssl/[>=3.0]");
    }
}

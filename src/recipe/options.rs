// src/recipe/options.rs

//! Options model: validation and normalization of recipe switches
//!
//! Normalization is a pure function of the declared options, the caller's
//! raw selections and the settings context. It never mutates its inputs.
//! Removal of inapplicable options runs in two fixed stages:
//!
//! 1. Platform removal: `fPIC` is dropped on operating systems without
//!    position-independent code.
//! 2. Option removal: `fPIC` is dropped when `shared` is enabled, since
//!    shared libraries are always position independent.
//!
//! Removing an option that is already gone is a no-op.

use crate::error::{Error, Result};
use crate::recipe::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Name of the position-independent-code option
pub const PIC_OPTION: &str = "fPIC";

/// Name of the shared-library option
pub const SHARED_OPTION: &str = "shared";

/// Raw option selections as supplied by the caller
pub type RawOptions = BTreeMap<String, String>;

/// A declared boolean option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    pub name: String,
    pub default: bool,
    /// Preprocessor define / build variable gated by this option
    #[serde(default)]
    pub define: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl OptionDecl {
    pub fn new(name: impl Into<String>, default: bool) -> Self {
        Self {
            name: name.into(),
            default,
            define: None,
            description: None,
        }
    }

    /// Attach the define this option gates
    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.define = Some(define.into());
        self
    }
}

/// Option values after validation and removal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedOptions {
    values: BTreeMap<String, bool>,
    removed: BTreeSet<String>,
}

impl NormalizedOptions {
    /// Value of an option, `None` if undeclared or removed
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    /// Whether the option is present and enabled
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether the option was removed during normalization
    pub fn is_removed(&self, name: &str) -> bool {
        self.removed.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.removed.iter().map(|s| s.as_str())
    }

    fn remove(&mut self, name: &str, reason: &str) {
        if self.values.remove(name).is_some() {
            debug!("Removed option {} ({})", name, reason);
            self.removed.insert(name.to_string());
        }
    }
}

/// Parse a boolean-like option value
pub fn parse_option_value(option: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidOptionValue {
            option: option.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parse a `name=value` selection as given on the command line
pub fn parse_assignment(assignment: &str) -> Result<(String, String)> {
    let (name, value) = assignment.split_once('=').ok_or_else(|| {
        Error::ParseError(format!("Expected name=value option, got '{}'", assignment))
    })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::ParseError(format!("Missing option name in '{}'", assignment)));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Validate raw selections and apply the removal policy
pub fn normalize(decls: &[OptionDecl], raw: &RawOptions, settings: &Settings) -> Result<NormalizedOptions> {
    let mut values: BTreeMap<String, bool> = decls
        .iter()
        .map(|d| (d.name.clone(), d.default))
        .collect();

    for (name, value) in raw {
        if !values.contains_key(name) {
            return Err(Error::UnknownOption(name.clone()));
        }
        let parsed = parse_option_value(name, value)?;
        values.insert(name.clone(), parsed);
    }

    let mut options = NormalizedOptions {
        values,
        removed: BTreeSet::new(),
    };

    if !settings.os.has_pic() {
        options.remove(PIC_OPTION, "not applicable on this OS");
    }

    if options.is_enabled(SHARED_OPTION) {
        options.remove(PIC_OPTION, "implied by shared");
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::settings::{BuildType, Os};

    fn decls() -> Vec<OptionDecl> {
        vec![
            OptionDecl::new("shared", false),
            OptionDecl::new("fPIC", true),
            OptionDecl::new("openssl", true).with_define("BEAUTY_ENABLE_OPENSSL"),
        ]
    }

    fn settings(os: Os) -> Settings {
        Settings::new(os, "gcc", BuildType::Release, "x86_64")
    }

    fn raw(pairs: &[(&str, &str)]) -> RawOptions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply() {
        let options = normalize(&decls(), &RawOptions::new(), &settings(Os::Linux)).unwrap();
        assert_eq!(options.get("shared"), Some(false));
        assert_eq!(options.get("fPIC"), Some(true));
        assert_eq!(options.get("openssl"), Some(true));
        assert_eq!(options.removed().count(), 0);
    }

    #[test]
    fn test_windows_removes_pic_regardless_of_value() {
        for value in ["True", "False"] {
            let options =
                normalize(&decls(), &raw(&[("fPIC", value)]), &settings(Os::Windows)).unwrap();
            assert!(!options.contains("fPIC"));
            assert!(options.is_removed("fPIC"));
        }
    }

    #[test]
    fn test_shared_removes_pic_even_when_enabled() {
        let options = normalize(
            &decls(),
            &raw(&[("shared", "True"), ("fPIC", "True")]),
            &settings(Os::Linux),
        )
        .unwrap();
        assert_eq!(options.get("fPIC"), None);
        assert!(options.is_removed("fPIC"));
        assert!(options.is_enabled("shared"));
    }

    #[test]
    fn test_double_removal_is_noop() {
        let options =
            normalize(&decls(), &raw(&[("shared", "true")]), &settings(Os::Windows)).unwrap();
        assert_eq!(options.removed().collect::<Vec<_>>(), vec!["fPIC"]);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = normalize(&decls(), &raw(&[("ssl", "true")]), &settings(Os::Linux)).unwrap_err();
        assert!(matches!(err, Error::UnknownOption(name) if name == "ssl"));
    }

    #[test]
    fn test_invalid_value_rejected() {
        let err =
            normalize(&decls(), &raw(&[("shared", "maybe")]), &settings(Os::Linux)).unwrap_err();
        assert!(matches!(err, Error::InvalidOptionValue { option, .. } if option == "shared"));
    }

    #[test]
    fn test_input_not_mutated_and_idempotent() {
        let input = raw(&[("shared", "False")]);
        let before = input.clone();
        let a = normalize(&decls(), &input, &settings(Os::Linux)).unwrap();
        let b = normalize(&decls(), &input, &settings(Os::Linux)).unwrap();
        assert_eq!(input, before);
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("openssl=False").unwrap(),
            ("openssl".to_string(), "False".to_string())
        );
        assert!(parse_assignment("openssl").is_err());
        assert!(parse_assignment("=1").is_err());
    }
}

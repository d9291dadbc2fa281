// src/recipe/settings.rs

//! Settings context: the target platform an evaluation builds for
//!
//! Settings are supplied once by the caller and never mutated by the
//! recipe. Every other component only reads them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};

/// Operating system family
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Os {
    Linux,
    #[strum(to_string = "Macos", serialize = "darwin")]
    #[serde(alias = "darwin", alias = "macos")]
    Macos,
    Windows,
    #[strum(to_string = "FreeBSD")]
    #[serde(rename = "FreeBSD")]
    FreeBsd,
}

impl Os {
    /// Detect the host operating system
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::Macos),
            "windows" => Some(Self::Windows),
            "freebsd" => Some(Self::FreeBsd),
            _ => None,
        }
    }

    /// Whether position-independent code is a meaningful concept here
    pub fn has_pic(&self) -> bool {
        !matches!(self, Self::Windows)
    }
}

/// Build type passed through to the external tool
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

/// Immutable description of the target platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub compiler: String,
    pub build_type: BuildType,
    pub arch: String,
}

impl Settings {
    pub fn new(os: Os, compiler: impl Into<String>, build_type: BuildType, arch: impl Into<String>) -> Self {
        Self {
            os,
            compiler: compiler.into(),
            build_type,
            arch: arch.into(),
        }
    }

    /// Build a settings context describing the host machine
    pub fn detect() -> Result<Self> {
        let os = Os::current().ok_or_else(|| {
            Error::ParseError(format!("Unsupported host OS: {}", std::env::consts::OS))
        })?;

        let compiler = match os {
            Os::Windows => "msvc",
            Os::Macos | Os::FreeBsd => "clang",
            Os::Linux => "gcc",
        };

        Ok(Self::new(os, compiler, BuildType::default(), std::env::consts::ARCH))
    }

    /// Apply one `key=value` override (keys: os, compiler, build_type, arch)
    pub fn apply(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            Error::ParseError(format!("Expected key=value setting, got '{}'", assignment))
        })?;
        let value = value.trim();

        match key.trim() {
            "os" => {
                self.os = Os::from_str(value)
                    .map_err(|_| Error::ParseError(format!("Unknown os '{}'", value)))?;
            }
            "build_type" => {
                self.build_type = BuildType::from_str(value)
                    .map_err(|_| Error::ParseError(format!("Unknown build_type '{}'", value)))?;
            }
            "compiler" => self.compiler = value.to_string(),
            "arch" => self.arch = value.to_string(),
            other => return Err(Error::ParseError(format!("Unknown setting '{}'", other))),
        }

        Ok(())
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} compiler={} build_type={} arch={}",
            self.os, self.compiler, self.build_type, self.arch
        )
    }
}

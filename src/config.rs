// src/config.rs

//! Ambient build-mode configuration
//!
//! These flags do not belong to any recipe: they describe how the caller
//! wants this evaluation run. They are resolved once, before evaluation
//! starts, from (later wins):
//!
//! 1. built-in defaults
//! 2. a TOML file (`$XDG_CONFIG_HOME/sous/config.toml` or an explicit path)
//! 3. `SOUS_*` environment variables
//!
//! The CLI applies its own flags on top of the result.
//!
//! ```toml
//! skip_tests = false
//! skip_examples = true
//! test_policy = "warn"
//! jobs = 8
//! ```

use crate::error::{Error, Result};
use crate::recipe::options::parse_option_value;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use tracing::debug;

pub const ENV_SKIP_TESTS: &str = "SOUS_SKIP_TESTS";
pub const ENV_SKIP_EXAMPLES: &str = "SOUS_SKIP_EXAMPLES";
pub const ENV_TEST_POLICY: &str = "SOUS_TEST_POLICY";
pub const ENV_JOBS: &str = "SOUS_JOBS";

/// What a failing test step means for the evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TestPolicy {
    /// Stop the evaluation; nothing is packaged
    #[default]
    Abort,
    /// Record and log the failure, then continue to packaging
    Warn,
}

/// Build-mode flags supplied by the invoking environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub skip_tests: bool,
    pub skip_examples: bool,
    pub test_policy: TestPolicy,
    /// Parallel jobs handed to the build tool (None = tool default)
    pub jobs: Option<u32>,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            skip_tests: false,
            skip_examples: false,
            test_policy: TestPolicy::Abort,
            jobs: None,
        }
    }
}

impl AmbientConfig {
    /// Default location of the user configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sous").join("config.toml"))
    }

    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::ParseError(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Resolve the configuration from file and process environment
    ///
    /// An explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        debug!("Ambient configuration: {:?}", config);
        Ok(config)
    }

    /// Overlay values from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SKIP_TESTS) {
            self.skip_tests = parse_option_value(ENV_SKIP_TESTS, &value)?;
        }
        if let Some(value) = lookup(ENV_SKIP_EXAMPLES) {
            self.skip_examples = parse_option_value(ENV_SKIP_EXAMPLES, &value)?;
        }
        if let Some(value) = lookup(ENV_TEST_POLICY) {
            self.test_policy = TestPolicy::from_str(&value).map_err(|_| {
                Error::ParseError(format!("Invalid {}: '{}'", ENV_TEST_POLICY, value))
            })?;
        }
        if let Some(value) = lookup(ENV_JOBS) {
            let jobs = value
                .trim()
                .parse()
                .map_err(|_| Error::ParseError(format!("Invalid {}: '{}'", ENV_JOBS, value)))?;
            self.jobs = Some(jobs);
        }
        Ok(())
    }

    /// Whether the test step should run
    pub fn run_tests(&self) -> bool {
        !self.skip_tests
    }

    /// Whether examples are built and packaged
    pub fn build_examples(&self) -> bool {
        !self.skip_examples
    }
}

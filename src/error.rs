// src/error.rs

//! Error types for recipe evaluation

use std::fmt;
use thiserror::Error;

/// Captured result of a failed external build tool step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Step name (configure, build, test, install)
    pub step: String,
    /// Exit status of the external tool (`None` if killed by a signal)
    pub status: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "{} step failed with exit code {}", self.step, code)?,
            None => write!(f, "{} step terminated by signal", self.step)?,
        }
        if !self.stderr.trim().is_empty() {
            write!(f, "\nstderr: {}", self.stderr.trim_end())?;
        }
        Ok(())
    }
}

/// Outcome categories reported for a whole evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::AsRefStr)]
pub enum EvaluationStatus {
    Success,
    ConfigurationError,
    BuildError,
    TestFailure,
    PackagingError,
}

impl EvaluationStatus {
    /// Process exit code used by the CLI for this status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::ConfigurationError => 2,
            Self::BuildError => 3,
            Self::TestFailure => 4,
            Self::PackagingError => 5,
        }
    }
}

/// Errors raised while evaluating a recipe
#[derive(Error, Debug)]
pub enum Error {
    /// Option value outside of its declared domain
    #[error("Invalid value '{value}' for option '{option}'")]
    InvalidOptionValue { option: String, value: String },

    /// Option name not declared by the recipe
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    /// Malformed recipe, settings or constraint text
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    /// External configure step failed
    #[error("Configuration failed: {0}")]
    ConfigurationError(StepFailure),

    /// External build step failed
    #[error("Build failed: {0}")]
    BuildError(StepFailure),

    /// External test step failed
    #[error("Tests failed: {0}")]
    TestFailure(StepFailure),

    /// Post-build assembly of the package layout failed
    #[error("Packaging failed: {0}")]
    PackagingError(String),

    /// Cancellation was requested between two steps
    #[error("Evaluation cancelled before {before} step")]
    Cancelled { before: String },

    /// The external build tool could not be located
    #[error("Build tool not found: {0}")]
    ToolNotFound(String),
}

impl Error {
    /// Map the error onto the evaluation status it reports as
    ///
    /// Input validation and I/O errors happen before or outside the
    /// external tool and have no dedicated status; they report `None`.
    pub fn status(&self) -> Option<EvaluationStatus> {
        match self {
            Self::ConfigurationError(_) => Some(EvaluationStatus::ConfigurationError),
            Self::BuildError(_) => Some(EvaluationStatus::BuildError),
            Self::TestFailure(_) => Some(EvaluationStatus::TestFailure),
            Self::PackagingError(_) => Some(EvaluationStatus::PackagingError),
            _ => None,
        }
    }

    /// Captured step output, when the error came from the external tool
    pub fn step_failure(&self) -> Option<&StepFailure> {
        match self {
            Self::ConfigurationError(f) | Self::BuildError(f) | Self::TestFailure(f) => Some(f),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::IoError(format!("JSON serialization failed: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(step: &str) -> StepFailure {
        StepFailure {
            step: step.to_string(),
            status: Some(1),
            stdout: String::new(),
            stderr: "boom\n".to_string(),
        }
    }

    #[test]
    fn test_step_failure_display_includes_stderr() {
        let text = failure("configure").to_string();
        assert!(text.contains("configure step failed with exit code 1"));
        assert!(text.contains("stderr: boom"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::ConfigurationError(failure("configure")).status(),
            Some(EvaluationStatus::ConfigurationError)
        );
        assert_eq!(
            Error::TestFailure(failure("test")).status(),
            Some(EvaluationStatus::TestFailure)
        );
        assert_eq!(Error::UnknownOption("x".into()).status(), None);
        assert_eq!(EvaluationStatus::PackagingError.exit_code(), 5);
    }
}

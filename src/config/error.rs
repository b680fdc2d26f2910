//! Configuration error types.

use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    // No #[from]: a source() here would print the list twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected field, with an optional fix hint.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: &'static str,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {}", self.field.cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({} {})", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Every problem found by one validation pass, reported together.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics(Vec<ConfigDiagnostic>);

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: &'static str,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: &'static str, message: String, hint: Option<String>) {
        self.0.push(ConfigDiagnostic {
            field,
            message,
            hint,
        });
    }

    /// `Ok` when nothing was reported.
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "invalid fingerprint config:".red().bold())?;
        for diagnostic in &self.0 {
            write!(f, "\n{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

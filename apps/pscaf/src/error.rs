//! CLI error handling

use std::fmt;

use pscaf_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(pscaf_errors::ConfigError),
    /// Error raised by a scaffolding run or its setup
    Scaffold(pscaf_errors::Error),
    /// Patches failed while `--strict` was in effect
    PatchesFailed(usize),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Scaffold(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::PatchesFailed(count) => {
                write!(f, "{count} patch(es) failed to apply (strict mode)")
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Scaffold(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::PatchesFailed(_) => None,
        }
    }
}

impl From<pscaf_errors::ConfigError> for CliError {
    fn from(e: pscaf_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<pscaf_errors::Error> for CliError {
    fn from(e: pscaf_errors::Error) -> Self {
        match e {
            pscaf_errors::Error::Config(config) => CliError::Config(config),
            other => CliError::Scaffold(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

//! Error types for backend construction

use std::path::PathBuf;

use ladr_syntax::ParseError;
use thiserror::Error;

/// Errors raised while setting up the external tools.
///
/// Launch and I/O problems during a run never surface here; they are
/// reported through [`crate::process::RunStatus`].
#[derive(Debug, Error)]
pub enum BackendError {
    /// The binary is missing from the configured directory
    #[error("{tool} not found at {} or with .exe extension", path.display())]
    NotFound { tool: &'static str, path: PathBuf },

    /// The configuration cannot be used
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input file could not be read or parsed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl BackendError {
    pub fn not_found(tool: &'static str, path: impl Into<PathBuf>) -> Self {
        BackendError::NotFound {
            tool,
            path: path.into(),
        }
    }
}

//! Error types for reading input files

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a Prover9/Mace4 input file
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input file does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading the input file failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A block header has no matching `end_of_list.` (strict policy only)
    #[error("formulas({0}) block is missing end_of_list.")]
    UnterminatedBlock(String),
}

impl ParseError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParseError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the file was absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, ParseError::NotFound(_))
    }
}

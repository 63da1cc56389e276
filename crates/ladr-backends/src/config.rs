//! Startup configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use ladr_syntax::BlockPolicy;

use crate::error::BackendError;
use crate::util::expand_home_dir;

/// Default wall-clock bound for a single run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings resolved once at startup and shared read-only afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory holding `prover9` and optionally `mace4`
    pub prover_dir: PathBuf,
    /// Bound for each Prover9 run
    pub prover_timeout: Duration,
    /// Bound for each Mace4 run
    pub model_timeout: Duration,
    /// Treatment of input files with an unterminated block
    pub block_policy: BlockPolicy,
}

impl EngineConfig {
    pub fn new(prover_dir: impl Into<PathBuf>) -> Self {
        Self {
            prover_dir: prover_dir.into(),
            prover_timeout: DEFAULT_TIMEOUT,
            model_timeout: DEFAULT_TIMEOUT,
            block_policy: BlockPolicy::default(),
        }
    }

    /// Build from a user-supplied directory string, expanding a leading `~/`
    pub fn from_path_str(dir: &str) -> Result<Self, BackendError> {
        let dir = dir.trim();
        if dir.is_empty() {
            return Err(BackendError::InvalidConfig(
                "prover path must not be empty".to_string(),
            ));
        }
        let expanded = expand_home_dir(dir).ok_or_else(|| {
            BackendError::InvalidConfig(format!("cannot expand {dir}: no home directory"))
        })?;
        Ok(Self::new(expanded))
    }

    pub fn with_prover_timeout(mut self, timeout: Duration) -> Self {
        self.prover_timeout = timeout;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn with_block_policy(mut self, policy: BlockPolicy) -> Self {
        self.block_policy = policy;
        self
    }

    pub fn prover_dir(&self) -> &Path {
        &self.prover_dir
    }

    /// Reject bounds that would make every run time out immediately
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.prover_timeout.is_zero() {
            return Err(BackendError::InvalidConfig(
                "prover timeout must be positive".to_string(),
            ));
        }
        if self.model_timeout.is_zero() {
            return Err(BackendError::InvalidConfig(
                "model timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

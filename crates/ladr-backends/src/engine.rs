//! Logic engine: the configured Prover9 and Mace4 backends

use std::path::Path;
use std::sync::Arc;

use ladr_syntax::{Parser, ProblemSpec};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::BackendError;
use crate::mace4::Mace4Backend;
use crate::prover9::Prover9Backend;
use crate::traits::{ModelFinder, TheoremProver};

/// Owns the backends built from one [`EngineConfig`].
///
/// A missing Prover9 binary fails construction. A missing Mace4 binary
/// only disables model search.
#[derive(Clone)]
pub struct LogicEngine {
    config: EngineConfig,
    prover: Arc<dyn TheoremProver>,
    model_finder: Option<Arc<dyn ModelFinder>>,
}

impl std::fmt::Debug for LogicEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicEngine")
            .field("config", &self.config)
            .field("prover", &self.prover.name())
            .field("model_finder", &self.model_finder.as_ref().map(|m| m.name()))
            .finish()
    }
}

impl LogicEngine {
    /// Locate the binaries under `config.prover_dir`
    pub fn new(config: EngineConfig) -> Result<Self, BackendError> {
        config.validate()?;

        let prover = Prover9Backend::locate(config.prover_dir(), config.prover_timeout)?;
        info!(binary = %prover.binary().display(), "Initialized Logic Engine with Prover9");

        let model_finder = match Mace4Backend::locate(config.prover_dir(), config.model_timeout) {
            Ok(mace4) => {
                info!(binary = %mace4.binary().display(), "Mace4 available");
                Some(Arc::new(mace4) as Arc<dyn ModelFinder>)
            }
            Err(e) => {
                warn!("Mace4 not available: {}", e);
                None
            }
        };

        Ok(Self {
            config,
            prover: Arc::new(prover),
            model_finder,
        })
    }

    /// Assemble an engine from already-built backends
    pub fn from_parts(
        config: EngineConfig,
        prover: Arc<dyn TheoremProver>,
        model_finder: Option<Arc<dyn ModelFinder>>,
    ) -> Self {
        Self {
            config,
            prover,
            model_finder,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn prover(&self) -> &dyn TheoremProver {
        self.prover.as_ref()
    }

    /// The model finder, if Mace4 was found at startup
    pub fn model_finder(&self) -> Option<&dyn ModelFinder> {
        self.model_finder.as_deref()
    }

    /// Input file parser using the configured block policy
    pub fn parser(&self) -> Parser {
        Parser::with_policy(self.config.block_policy)
    }

    /// Read a problem from an input file
    pub fn load_problem(&self, path: impl AsRef<Path>) -> Result<ProblemSpec, BackendError> {
        Ok(self.parser().parse_file(path)?)
    }
}

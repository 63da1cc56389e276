//! Prover9 backend

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use ladr_syntax::{synthesize, ProblemSpec};
use tracing::{debug, info, warn};

use crate::classify::{classify, ProofResult};
use crate::error::BackendError;
use crate::process::ProverProcessRunner;
use crate::traits::TheoremProver;
use crate::util::{find_binary, head_lines};

pub const PROVER9_BINARY: &str = "prover9";

/// Prover9 bound to one binary and one timeout
#[derive(Debug, Clone)]
pub struct Prover9Backend {
    runner: ProverProcessRunner,
    timeout: Duration,
}

impl Prover9Backend {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            runner: ProverProcessRunner::new(binary),
            timeout,
        }
    }

    /// Locate `prover9` (or `prover9.exe`) in `dir`
    pub fn locate(dir: &Path, timeout: Duration) -> Result<Self, BackendError> {
        let binary =
            find_binary(dir, PROVER9_BINARY).map_err(|p| BackendError::not_found("Prover9", p))?;
        debug!(binary = %binary.display(), "Found Prover9");
        Ok(Self::new(binary, timeout))
    }

    pub fn binary(&self) -> &Path {
        self.runner.binary()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl TheoremProver for Prover9Backend {
    fn name(&self) -> &'static str {
        "Prover9"
    }

    async fn prove(&self, problem: &ProblemSpec) -> ProofResult {
        if !problem.has_goal() {
            return ProofResult::error("No goal to prove");
        }

        let input = synthesize(problem);
        let raw = self.runner.run_text(&input, &[], self.timeout).await;
        let result = classify(&raw);

        match &result {
            ProofResult::Proved { .. } | ProofResult::Unprovable { .. } => {
                info!(result = result.kind(), elapsed = ?raw.elapsed, "Prover9 finished");
            }
            ProofResult::Timeout { .. } => {
                warn!("Proof search timed out after {} seconds", self.timeout.as_secs());
            }
            ProofResult::SyntaxError { error, .. } => {
                warn!(error = %head_lines(error, 3), "Prover9 rejected the input");
            }
            ProofResult::Error { reason, .. } => {
                warn!(%reason, "Prover9 run failed");
            }
        }
        result
    }
}

//! Backend traits
//!
//! The tool layer only talks to these traits, so fake backends can stand
//! in for the binaries in tests.

use async_trait::async_trait;
use ladr_syntax::ProblemSpec;

use crate::classify::ProofResult;
use crate::mace4::ModelResult;

/// Something that can attempt a proof of a goal from premises
#[async_trait]
pub trait TheoremProver: Send + Sync {
    /// Short tool name for logs
    fn name(&self) -> &'static str;

    /// Run one bounded proof attempt. Never fails; every outcome is a
    /// [`ProofResult`] variant.
    async fn prove(&self, problem: &ProblemSpec) -> ProofResult;
}

/// Something that can search for finite models
#[async_trait]
pub trait ModelFinder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Search for a model of `premises`. Without a domain size the default
    /// size range is searched in one run.
    async fn find_model(&self, premises: &[String], domain_size: Option<u32>) -> ModelResult;

    /// Search for a model of `premises` in which `conclusion` is false
    async fn find_counterexample(
        &self,
        premises: &[String],
        conclusion: &str,
        domain_size: Option<u32>,
    ) -> ModelResult;
}

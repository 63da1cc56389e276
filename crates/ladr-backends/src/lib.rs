//! Prover9 and Mace4 backends
//!
//! Each run synthesizes an input file, starts the binary from its own
//! directory under a hard wall-clock bound, and classifies the report into a
//! structured result. Runs share nothing but the filesystem and the process
//! table, so any number can be in flight at once.
//!
//! # Modules
//!
//! - [`process`] - bounded subprocess execution with kill-on-timeout
//! - [`classify`] - marker tables mapping reports to outcomes
//! - [`prover9`] - theorem proving
//! - [`mace4`] - finite model and counterexample search
//! - [`engine`] - startup wiring of both backends

// Crate-level lint configuration for pedantic clippy
#![allow(clippy::uninlined_format_args)] // Log and report strings read better with positional args
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)] // Builder pattern doesn't need must_use

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod mace4;
pub mod process;
pub mod prover9;
pub mod traits;
pub mod util;

pub use classify::{classify, ProofResult};
pub use config::EngineConfig;
pub use engine::LogicEngine;
pub use error::BackendError;
pub use mace4::{Mace4Backend, ModelResult, SizeRange};
pub use process::{ProverProcessRunner, RawProverOutput, RunStatus};
pub use prover9::Prover9Backend;
pub use traits::{ModelFinder, TheoremProver};

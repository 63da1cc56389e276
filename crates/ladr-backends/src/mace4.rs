//! Mace4 finite model finder backend
//!
//! A model search feeds the premises alone; a counterexample search adds the
//! conclusion as a goal, which Mace4 negates before searching. Both run the
//! whole size range in a single process.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use ladr_syntax::{synthesize, ProblemSpec};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classify::{extract_block, first_match, ModelVerdict, MACE4_MARKERS};
use crate::error::BackendError;
use crate::process::{ProverProcessRunner, RawProverOutput, RunStatus};
use crate::traits::ModelFinder;
use crate::util::{find_binary, head_lines};

pub const MACE4_BINARY: &str = "mace4";

/// Smallest domain size searched by default
pub const DEFAULT_MIN_SIZE: u32 = 2;

/// Largest domain size searched by default
pub const DEFAULT_MAX_SIZE: u32 = 10;

/// Inclusive range of domain sizes for one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub start: u32,
    pub end: u32,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_MIN_SIZE,
            end: DEFAULT_MAX_SIZE,
        }
    }
}

impl SizeRange {
    /// Exactly `size` when given, otherwise the default range
    pub fn for_request(domain_size: Option<u32>) -> Result<Self, String> {
        match domain_size {
            None => Ok(Self::default()),
            Some(0) => Err("domain_size must be at least 1".to_string()),
            Some(size) => Ok(Self {
                start: size,
                end: size,
            }),
        }
    }

    fn options(&self) -> Vec<String> {
        vec![
            "-c".to_string(),
            "-n".to_string(),
            self.start.to_string(),
            "-N".to_string(),
            self.end.to_string(),
        ]
    }

    fn describe(&self) -> String {
        if self.start == self.end {
            format!("domain size {}", self.start)
        } else {
            format!("domain sizes {} to {}", self.start, self.end)
        }
    }
}

/// Classified outcome of one Mace4 search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ModelResult {
    ModelFound {
        #[serde(skip_serializing_if = "Option::is_none")]
        domain_size: Option<u32>,
        model: String,
    },
    NoModel {
        reason: String,
        searched_sizes: [u32; 2],
    },
    CounterexampleFound {
        #[serde(skip_serializing_if = "Option::is_none")]
        domain_size: Option<u32>,
        model: String,
        interpretation: String,
    },
    NoCounterexample {
        reason: String,
        searched_sizes: [u32; 2],
        interpretation: String,
    },
    SyntaxError {
        reason: String,
        error: String,
    },
    Timeout {
        reason: String,
        timeout_seconds: u64,
    },
    Error {
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ModelResult {
    pub fn error(reason: impl Into<String>) -> Self {
        ModelResult::Error {
            reason: reason.into(),
            output: None,
            error: None,
        }
    }

    /// Value of the `result` tag
    pub fn kind(&self) -> &'static str {
        match self {
            ModelResult::ModelFound { .. } => "model_found",
            ModelResult::NoModel { .. } => "no_model",
            ModelResult::CounterexampleFound { .. } => "counterexample_found",
            ModelResult::NoCounterexample { .. } => "no_counterexample",
            ModelResult::SyntaxError { .. } => "syntax_error",
            ModelResult::Timeout { .. } => "timeout",
            ModelResult::Error { .. } => "error",
        }
    }
}

/// What a search is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Model,
    Counterexample,
}

/// Map one Mace4 run to exactly one [`ModelResult`]
pub fn classify_model(raw: &RawProverOutput, kind: SearchKind, sizes: SizeRange) -> ModelResult {
    match &raw.status {
        RunStatus::TimedOut { limit_secs } => {
            return ModelResult::Timeout {
                reason: format!("Model search exceeded {} seconds", limit_secs),
                timeout_seconds: *limit_secs,
            }
        }
        RunStatus::LaunchFailed { reason } => return ModelResult::error(reason.clone()),
        RunStatus::Completed { .. } => {}
    }

    let searched_sizes = [sizes.start, sizes.end];
    match (first_match(MACE4_MARKERS, raw), kind) {
        (Some(ModelVerdict::Found), SearchKind::Model) => ModelResult::ModelFound {
            domain_size: domain_size(&raw.stdout),
            model: model_text(&raw.stdout),
        },
        (Some(ModelVerdict::Found), SearchKind::Counterexample) => {
            ModelResult::CounterexampleFound {
                domain_size: domain_size(&raw.stdout),
                model: model_text(&raw.stdout),
                interpretation: "The premises hold and the conclusion fails in this model, \
                                 so the conclusion does not follow from the premises"
                    .to_string(),
            }
        }
        (Some(ModelVerdict::Exhausted), SearchKind::Model) => ModelResult::NoModel {
            reason: format!("No model found for {}", sizes.describe()),
            searched_sizes,
        },
        (Some(ModelVerdict::Exhausted), SearchKind::Counterexample) => {
            ModelResult::NoCounterexample {
                reason: format!("No counterexample found for {}", sizes.describe()),
                searched_sizes,
                interpretation: "The conclusion may follow from the premises; \
                                 use the prove tool to confirm"
                    .to_string(),
            }
        }
        (Some(ModelVerdict::SyntaxError), _) => ModelResult::SyntaxError {
            reason: "Syntax error".to_string(),
            error: raw.stderr.clone(),
        },
        (None, _) => ModelResult::Error {
            reason: "Unexpected output".to_string(),
            output: Some(raw.stdout.clone()),
            error: Some(raw.stderr.clone()),
        },
    }
}

/// Domain size of the first interpretation in the report
fn domain_size(stdout: &str) -> Option<u32> {
    let re = Regex::new(r"interpretation\(\s*(\d+)").ok()?;
    re.captures(stdout)?.get(1)?.as_str().parse().ok()
}

/// The first MODEL block, or the bare interpretation term when the report
/// has no banner
fn model_text(stdout: &str) -> String {
    if let Some(block) = extract_block(stdout, "MODEL =").filter(|b| !b.is_empty()) {
        return block;
    }
    let Some(start) = stdout.find("interpretation(") else {
        return String::new();
    };
    let rest = &stdout[start..];
    match rest.find("]).") {
        Some(end) => rest[..end + 3].to_string(),
        None => rest.trim_end().to_string(),
    }
}

/// Mace4 bound to one binary and one timeout
#[derive(Debug, Clone)]
pub struct Mace4Backend {
    runner: ProverProcessRunner,
    timeout: Duration,
}

impl Mace4Backend {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            runner: ProverProcessRunner::new(binary),
            timeout,
        }
    }

    /// Locate `mace4` (or `mace4.exe`) in `dir`
    pub fn locate(dir: &Path, timeout: Duration) -> Result<Self, BackendError> {
        let binary =
            find_binary(dir, MACE4_BINARY).map_err(|p| BackendError::not_found("Mace4", p))?;
        debug!(binary = %binary.display(), "Found Mace4");
        Ok(Self::new(binary, timeout))
    }

    pub fn binary(&self) -> &Path {
        self.runner.binary()
    }

    async fn search(
        &self,
        problem: &ProblemSpec,
        kind: SearchKind,
        domain_size: Option<u32>,
    ) -> ModelResult {
        let sizes = match SizeRange::for_request(domain_size) {
            Ok(sizes) => sizes,
            Err(reason) => return ModelResult::error(reason),
        };

        let input = synthesize(problem);
        let raw = self
            .runner
            .run_text(&input, &sizes.options(), self.timeout)
            .await;
        let result = classify_model(&raw, kind, sizes);

        match &result {
            ModelResult::Timeout { .. } => {
                warn!("Model search timed out after {} seconds", self.timeout.as_secs());
            }
            ModelResult::SyntaxError { error, .. } => {
                warn!(error = %head_lines(error, 3), "Mace4 rejected the input");
            }
            ModelResult::Error { reason, .. } => warn!(%reason, "Mace4 run failed"),
            _ => info!(result = result.kind(), elapsed = ?raw.elapsed, "Mace4 finished"),
        }
        result
    }
}

#[async_trait]
impl ModelFinder for Mace4Backend {
    fn name(&self) -> &'static str {
        "Mace4"
    }

    async fn find_model(&self, premises: &[String], domain_size: Option<u32>) -> ModelResult {
        let problem = ProblemSpec::new(premises.to_vec(), None);
        self.search(&problem, SearchKind::Model, domain_size).await
    }

    async fn find_counterexample(
        &self,
        premises: &[String],
        conclusion: &str,
        domain_size: Option<u32>,
    ) -> ModelResult {
        let problem = ProblemSpec::new(premises.to_vec(), Some(conclusion.to_string()));
        self.search(&problem, SearchKind::Counterexample, domain_size)
            .await
    }
}

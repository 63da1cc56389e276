//! Output classification for Prover9 and Mace4
//!
//! Neither binary exposes a structured exit-code contract, so outcomes are
//! read from marker strings in its report. All marker strings live in the
//! tables below; a new binary version should only need a table change.

use serde::{Deserialize, Serialize};

use crate::process::{RawProverOutput, RunStatus};

/// Which captured stream a marker is searched in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// One row of a marker table
#[derive(Debug, Clone, Copy)]
pub struct Marker<V> {
    pub stream: Stream,
    pub needle: &'static str,
    pub verdict: V,
}

impl<V> Marker<V> {
    const fn stdout(needle: &'static str, verdict: V) -> Self {
        Self {
            stream: Stream::Stdout,
            needle,
            verdict,
        }
    }

    const fn stderr(needle: &'static str, verdict: V) -> Self {
        Self {
            stream: Stream::Stderr,
            needle,
            verdict,
        }
    }

    fn matches(&self, raw: &RawProverOutput) -> bool {
        let haystack = match self.stream {
            Stream::Stdout => &raw.stdout,
            Stream::Stderr => &raw.stderr,
        };
        haystack.contains(self.needle)
    }
}

/// Verdict of the first matching row, in table order
pub fn first_match<V: Copy>(table: &[Marker<V>], raw: &RawProverOutput) -> Option<V> {
    table.iter().find(|m| m.matches(raw)).map(|m| m.verdict)
}

// ============================================================================
// Prover9
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProverVerdict {
    Proved,
    Unprovable,
    SyntaxError,
}

/// Prover9 report markers, first match wins
pub const PROVER9_MARKERS: &[Marker<ProverVerdict>] = &[
    Marker::stdout("THEOREM PROVED", ProverVerdict::Proved),
    Marker::stdout("SEARCH FAILED", ProverVerdict::Unprovable),
    Marker::stderr("Fatal error", ProverVerdict::SyntaxError),
];

/// Classified outcome of one proof attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProofResult {
    Proved {
        proof: String,
        complete_output: String,
    },
    Unprovable {
        reason: String,
        complete_output: String,
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

impl ProofResult {
    pub fn timeout(limit_secs: u64) -> Self {
        ProofResult::Timeout {
            reason: format!("Proof search exceeded {} seconds", limit_secs),
            timeout_seconds: limit_secs,
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        ProofResult::Error {
            reason: reason.into(),
            output: None,
            error: None,
        }
    }

    pub fn is_proved(&self) -> bool {
        matches!(self, ProofResult::Proved { .. })
    }

    /// Value of the `result` tag
    pub fn kind(&self) -> &'static str {
        match self {
            ProofResult::Proved { .. } => "proved",
            ProofResult::Unprovable { .. } => "unprovable",
            ProofResult::SyntaxError { .. } => "syntax_error",
            ProofResult::Timeout { .. } => "timeout",
            ProofResult::Error { .. } => "error",
        }
    }
}

/// Map one Prover9 run to exactly one [`ProofResult`]
pub fn classify(raw: &RawProverOutput) -> ProofResult {
    match &raw.status {
        RunStatus::TimedOut { limit_secs } => return ProofResult::timeout(*limit_secs),
        RunStatus::LaunchFailed { reason } => return ProofResult::error(reason.clone()),
        RunStatus::Completed { .. } => {}
    }

    match first_match(PROVER9_MARKERS, raw) {
        Some(ProverVerdict::Proved) => ProofResult::Proved {
            proof: extract_block(&raw.stdout, "PROOF =").unwrap_or_default(),
            complete_output: raw.stdout.clone(),
        },
        Some(ProverVerdict::Unprovable) => ProofResult::Unprovable {
            reason: "Proof search failed".to_string(),
            complete_output: raw.stdout.clone(),
        },
        Some(ProverVerdict::SyntaxError) => ProofResult::SyntaxError {
            reason: "Syntax error".to_string(),
            error: raw.stderr.clone(),
        },
        None => ProofResult::Error {
            reason: "Unexpected output".to_string(),
            output: Some(raw.stdout.clone()),
            error: Some(raw.stderr.clone()),
        },
    }
}

/// Text between `marker` and the next run of `====`, trimmed.
///
/// The banner line that carries the marker is padded with `=`; that
/// padding is skipped before looking for the closing run.
pub fn extract_block(text: &str, marker: &str) -> Option<String> {
    let start = text.find(marker)? + marker.len();
    let rest = text[start..].trim_start_matches('=');
    let body = match rest.find("====") {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(body.trim().to_string())
}

// ============================================================================
// Mace4
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVerdict {
    Found,
    Exhausted,
    SyntaxError,
}

/// Mace4 report markers, first match wins
pub const MACE4_MARKERS: &[Marker<ModelVerdict>] = &[
    Marker::stdout("interpretation(", ModelVerdict::Found),
    Marker::stdout("Exiting with failure", ModelVerdict::Exhausted),
    Marker::stdout("exit (exhausted)", ModelVerdict::Exhausted),
    Marker::stdout("SEARCH FAILED", ModelVerdict::Exhausted),
    Marker::stderr("Fatal error", ModelVerdict::SyntaxError),
];

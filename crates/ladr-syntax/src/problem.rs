//! Problem data model

use serde::{Deserialize, Serialize};

/// Statement terminator used by the LADR input language
pub const TERMINATOR: char = '.';

/// Premises plus an optional goal, as submitted for one proof or model search.
///
/// Premise order is preserved end to end since it can steer the external
/// search heuristics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSpec {
    /// Assumptions, in input order
    pub premises: Vec<String>,
    /// Goal to prove (the first goal when read from a file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

impl ProblemSpec {
    pub fn new(premises: Vec<String>, goal: Option<String>) -> Self {
        Self { premises, goal }
    }

    /// Premises followed by the goal, if any
    pub fn all_formulas(&self) -> Vec<String> {
        let mut all = self.premises.clone();
        all.extend(self.goal.iter().cloned());
        all
    }

    pub fn has_goal(&self) -> bool {
        self.goal.is_some()
    }
}

/// The formula with exactly one trailing terminator
pub fn terminated(formula: &str) -> String {
    let body = formula.trim_end_matches(|c: char| c == TERMINATOR || c.is_whitespace());
    format!("{body}{TERMINATOR}")
}

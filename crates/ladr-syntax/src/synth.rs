//! Input file rendering
//!
//! Prover9 and Mace4 are strict about block headers and expect one formula
//! per line, so the layout here is fixed byte for byte.

use crate::parser::{ASSUMPTIONS_HEADER, END_OF_LIST, GOALS_HEADER};
use crate::problem::{terminated, ProblemSpec};

/// Render a problem as Prover9/Mace4 input text.
///
/// Every formula gets exactly one terminator. Without a goal only the
/// assumptions block is emitted, which is the shape Mace4 expects for a
/// plain model search.
pub fn synthesize(spec: &ProblemSpec) -> String {
    let mut lines = Vec::with_capacity(spec.premises.len() + 6);
    lines.push(ASSUMPTIONS_HEADER.to_string());
    lines.extend(spec.premises.iter().map(|p| terminated(p)));
    lines.push(END_OF_LIST.to_string());

    if let Some(goal) = &spec.goal {
        lines.push(String::new());
        lines.push(GOALS_HEADER.to_string());
        lines.push(terminated(goal));
        lines.push(END_OF_LIST.to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socrates_layout() {
        let spec = ProblemSpec::new(
            vec![
                "all x (man(x) -> mortal(x))".to_string(),
                "man(socrates)".to_string(),
            ],
            Some("mortal(socrates)".to_string()),
        );
        assert_eq!(
            synthesize(&spec),
            "formulas(assumptions).\nall x (man(x) -> mortal(x)).\nman(socrates).\nend_of_list.\n\nformulas(goals).\nmortal(socrates).\nend_of_list."
        );
    }

    #[test]
    fn existing_terminators_are_not_doubled() {
        let spec = ProblemSpec::new(vec!["p(a).".to_string()], Some("p(a).".to_string()));
        let text = synthesize(&spec);
        assert!(text.contains("\np(a).\n"));
        assert!(!text.contains(".."));
    }

    #[test]
    fn repeated_terminators_are_collapsed() {
        let spec = ProblemSpec::new(vec!["p(a)..".to_string()], Some("q(b) . .".to_string()));
        assert_eq!(
            synthesize(&spec),
            "formulas(assumptions).\np(a).\nend_of_list.\n\nformulas(goals).\nq(b).\nend_of_list."
        );
    }

    #[test]
    fn no_goal_emits_assumptions_only() {
        let spec = ProblemSpec::new(vec!["p(a)".to_string()], None);
        assert_eq!(
            synthesize(&spec),
            "formulas(assumptions).\np(a).\nend_of_list."
        );
    }

    #[test]
    fn empty_premises_keep_both_blocks() {
        let spec = ProblemSpec::new(vec![], Some("p | -p".to_string()));
        assert_eq!(
            synthesize(&spec),
            "formulas(assumptions).\nend_of_list.\n\nformulas(goals).\np | -p.\nend_of_list."
        );
    }

    #[test]
    fn premise_order_is_preserved() {
        let premises: Vec<String> = ["c", "a", "b"].iter().map(|s| s.to_string()).collect();
        let text = synthesize(&ProblemSpec::new(premises, None));
        let c = text.find("\nc.\n").unwrap();
        let a = text.find("\na.\n").unwrap();
        let b = text.find("\nb.\n").unwrap();
        assert!(c < a && a < b);
    }
}

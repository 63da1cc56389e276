//! Lexical well-formedness checks
//!
//! These checks catch the mistakes that make Prover9 abort with a fatal
//! parse error (unbalanced parentheses, stray connectives, statements
//! glued together) before a process is spawned. They do not type-check
//! terms or resolve symbol arities.
//!
//! Attributes such as `p(a) # label(fact)` are accepted; connective and
//! quantifier checks apply to the part before the first `#`.

use serde::{Deserialize, Serialize};

use crate::parser::COMMENT_MARKER;
use crate::problem::TERMINATOR;

const QUANTIFIERS: &[&str] = &["all", "exists"];
const BINARY_CONNECTIVES: &[&str] = &["<->", "->", "<-", "&", "|", "="];
const FORBIDDEN_CHARS: &[char] = &[';', '?', '`', COMMENT_MARKER];

/// Separates a formula from its attributes
pub const ATTRIBUTE_MARKER: char = '#';

/// Validation outcome for one formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaReport {
    pub formula: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Validation outcome for a batch of formulas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when every formula is valid
    pub valid: bool,
    pub formulas: Vec<FormulaReport>,
    pub summary: String,
}

impl ValidationReport {
    /// Formulas that failed validation
    pub fn invalid(&self) -> impl Iterator<Item = &FormulaReport> {
        self.formulas.iter().filter(|f| !f.valid)
    }
}

/// Check every formula and aggregate the result
pub fn validate_formulas<S: AsRef<str>>(formulas: &[S]) -> ValidationReport {
    let reports: Vec<FormulaReport> = formulas
        .iter()
        .map(|f| validate_formula(f.as_ref()))
        .collect();
    let ok = reports.iter().filter(|r| r.valid).count();
    let summary = if reports.is_empty() {
        "No formulas to check".to_string()
    } else {
        format!("{} of {} formulas well-formed", ok, reports.len())
    };

    ValidationReport {
        valid: ok == reports.len(),
        formulas: reports,
        summary,
    }
}

/// Check a single formula
pub fn validate_formula(formula: &str) -> FormulaReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let trimmed = formula.trim();
    let body = match trimmed.strip_suffix(TERMINATOR) {
        Some(stripped) => {
            warnings.push("Trailing '.' is not needed; it is added automatically".to_string());
            stripped.trim_end()
        }
        None => trimmed,
    };
    let split_at = body.find(ATTRIBUTE_MARKER).unwrap_or(body.len());
    let (statement, attributes) = (body[..split_at].trim_end(), &body[split_at..]);

    if statement.is_empty() {
        errors.push("Formula is empty".to_string());
    } else if body.ends_with(TERMINATOR) {
        errors.push("Formula ends with more than one '.'".to_string());
    } else {
        check_characters(body, &mut errors);
        check_parentheses(body, &mut errors);
        check_connectives(statement, &mut errors);
        check_quantifiers(statement, &mut errors);
        check_embedded_terminator(body, &mut errors);
        check_attributes(attributes, split_at, &mut errors);
    }

    FormulaReport {
        formula: formula.to_string(),
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn check_characters(body: &str, errors: &mut Vec<String>) {
    for (pos, c) in body.char_indices() {
        if FORBIDDEN_CHARS.contains(&c) {
            errors.push(format!("Unexpected character '{}' at position {}", c, pos));
        }
    }
}

fn check_parentheses(body: &str, errors: &mut Vec<String>) {
    let mut stack: Vec<(char, usize)> = Vec::new();
    for (pos, c) in body.char_indices() {
        match c {
            '(' | '[' | '{' => stack.push((c, pos)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_pos)) => errors.push(format!(
                        "'{}' at position {} closes '{}' opened at position {}",
                        c, pos, open, open_pos
                    )),
                    None => errors.push(format!("Unmatched '{}' at position {}", c, pos)),
                }
            }
            _ => {}
        }
    }
    for (open, pos) in stack {
        errors.push(format!("Unclosed '{}' opened at position {}", open, pos));
    }
}

fn check_connectives(body: &str, errors: &mut Vec<String>) {
    for op in BINARY_CONNECTIVES {
        if body.starts_with(op) {
            errors.push(format!("Formula starts with binary operator '{}'", op));
            break;
        }
    }
    for op in BINARY_CONNECTIVES {
        if body.ends_with(op) {
            errors.push(format!("Formula ends with dangling operator '{}'", op));
            return;
        }
    }
    if body.ends_with('-') {
        errors.push("Formula ends with a negation sign".to_string());
    }
}

fn check_quantifiers(body: &str, errors: &mut Vec<String>) {
    let words = identifier_spans(body);
    for (start, end) in &words {
        let word = &body[*start..*end];
        if !QUANTIFIERS.contains(&word) {
            continue;
        }
        // A quantifier used as a function or predicate symbol is not a binder
        let rest = &body[*end..];
        if rest.starts_with('(') {
            continue;
        }
        let next = rest.trim_start();
        let binds_variable = next
            .chars()
            .next()
            .map_or(false, |c| c.is_alphabetic() || c == '_');
        if !binds_variable {
            errors.push(format!(
                "Quantifier '{}' at position {} must be followed by a variable",
                word, start
            ));
        }
    }
}

/// Every `#` must be followed by an attribute term
fn check_attributes(attributes: &str, offset: usize, errors: &mut Vec<String>) {
    // `attributes` starts at a marker, so the first piece is always empty
    let mut marker_pos = offset;
    for attr in attributes.split(ATTRIBUTE_MARKER).skip(1) {
        if attr.trim().is_empty() {
            errors.push(format!("Empty attribute after '#' at position {}", marker_pos));
        }
        marker_pos += attr.len() + 1;
    }
}

fn check_embedded_terminator(body: &str, errors: &mut Vec<String>) {
    let mut chars = body.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        if c == TERMINATOR && chars.peek().map_or(false, |(_, n)| n.is_whitespace()) {
            errors.push(format!(
                "'.' followed by whitespace at position {} ends the statement early",
                pos
            ));
        }
    }
}

/// Byte spans of identifier-like words
fn identifier_spans(body: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (pos, c) in body.char_indices() {
        let is_ident = c.is_alphanumeric() || c == '_' || c == '$';
        match (is_ident, start) {
            (true, None) => start = Some(pos),
            (false, Some(s)) => {
                spans.push((s, pos));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, body.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_socrates() {
        let report = validate_formulas(&[
            "all x (man(x) -> mortal(x))",
            "man(socrates)",
            "mortal(socrates)",
        ]);
        assert!(report.valid);
        assert_eq!(report.summary, "3 of 3 formulas well-formed");
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        let report = validate_formula("all x (man(x) -> mortal(x)");
        assert!(!report.valid);
        assert!(report.errors[0].contains("Unclosed '('"));
    }

    #[test]
    fn rejects_extra_close() {
        let report = validate_formula("p(a))");
        assert!(!report.valid);
        assert!(report.errors[0].contains("Unmatched ')'"));
    }

    #[test]
    fn rejects_mismatched_brackets() {
        let report = validate_formula("p([a)]");
        assert!(!report.valid);
    }

    #[test]
    fn rejects_empty() {
        let report = validate_formula("   ");
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Formula is empty"]);
    }

    #[test]
    fn rejects_dangling_implication() {
        let report = validate_formula("p(a) ->");
        assert!(!report.valid);
        assert!(report.errors[0].contains("'->'"));
    }

    #[test]
    fn rejects_leading_conjunction() {
        let report = validate_formula("& p(a)");
        assert!(!report.valid);
    }

    #[test]
    fn rejects_quantifier_without_variable() {
        let report = validate_formula("all (p(x))");
        assert!(!report.valid);
        assert!(report.errors[0].contains("Quantifier 'all'"));
    }

    #[test]
    fn quantifier_names_inside_identifiers_are_fine() {
        assert!(validate_formula("allowed(x) & existsp(y)").valid);
    }

    #[test]
    fn rejects_glued_statements() {
        let report = validate_formula("p(a). q(b)");
        assert!(!report.valid);
        assert!(report.errors[0].contains("ends the statement early"));
    }

    #[test]
    fn rejects_comment_marker() {
        let report = validate_formula("p(a) % note");
        assert!(!report.valid);
    }

    #[test]
    fn attributes_are_accepted() {
        let report = validate_formula("man(socrates) # label(fact)");
        assert!(report.valid, "{:?}", report.errors);
        assert!(validate_formula("p(a) # label(one) # answer(x).").valid);
    }

    #[test]
    fn attribute_does_not_hide_dangling_operator() {
        let report = validate_formula("p(a) -> # label(x)");
        assert!(!report.valid);
        assert!(report.errors[0].contains("'->'"));
    }

    #[test]
    fn rejects_empty_attribute() {
        let report = validate_formula("p(a) #");
        assert!(!report.valid);
        assert!(report.errors[0].contains("Empty attribute"));
    }

    #[test]
    fn rejects_doubled_terminator() {
        let report = validate_formula("p(a)..");
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Formula ends with more than one '.'"]);
    }

    #[test]
    fn trailing_terminator_is_a_warning() {
        let report = validate_formula("p(a).");
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn negation_and_equality_are_accepted() {
        assert!(validate_formula("-(x = y) | f(x,e) = x").valid);
        assert!(validate_formula("x * (y * z) = (x * y) * z").valid);
    }

    #[test]
    fn report_lists_invalid_entries() {
        let report = validate_formulas(&["p(a)", "q(("]);
        assert!(!report.valid);
        let bad: Vec<_> = report.invalid().map(|f| f.formula.as_str()).collect();
        assert_eq!(bad, vec!["q(("]);
    }

    #[test]
    fn empty_batch() {
        let report = validate_formulas::<&str>(&[]);
        assert!(report.valid);
        assert_eq!(report.summary, "No formulas to check");
    }

    #[test]
    fn serializes_without_empty_lists() {
        let report = validate_formula("p(a)");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("errors").is_none());
        assert_eq!(json["valid"], true);
    }
}

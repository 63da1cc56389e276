//! Reader for Prover9/Mace4 input files
//!
//! Only the first `formulas(assumptions).` block and the first
//! `formulas(goals).` block are honored. Option directives such as
//! `assign(...)` or `set(...)` outside those blocks are ignored.
//!
//! Two policies are preserved on purpose:
//!
//! - only the first goal of the goals block becomes the conclusion, the
//!   remaining goals are dropped;
//! - under [`BlockPolicy::Lenient`] a block without `end_of_list.` is
//!   treated as absent instead of failing.
//!
//! Comment handling is wider than whole comment lines: `%` starts a comment
//! anywhere on a line, the way the LADR tokenizer reads it, so
//! `q(b). % a fact` keeps only `q(b).`. A formula therefore cannot contain
//! `%`, which the LADR syntax never allows anyway.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::ParseError;
use crate::problem::{ProblemSpec, TERMINATOR};

/// Marker that starts a comment running to the end of the line
pub const COMMENT_MARKER: char = '%';

/// Header of the premises block
pub const ASSUMPTIONS_HEADER: &str = "formulas(assumptions).";

/// Header of the goals block
pub const GOALS_HEADER: &str = "formulas(goals).";

/// Closing marker of every block
pub const END_OF_LIST: &str = "end_of_list.";

/// Prefix shared by every block header
const BLOCK_PREFIX: &str = "formulas(";

/// How to treat a block whose `end_of_list.` is missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockPolicy {
    /// The block yields no formulas
    #[default]
    Lenient,
    /// The block raises [`ParseError::UnterminatedBlock`]
    Strict,
}

/// Outcome of looking for one block
#[derive(Debug, PartialEq, Eq)]
enum BlockScan<'a> {
    Absent,
    Unterminated,
    Found(&'a str),
}

/// Input file parser
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    policy: BlockPolicy,
}

impl Parser {
    /// Create a lenient parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with an explicit malformed-block policy
    pub fn with_policy(policy: BlockPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> BlockPolicy {
        self.policy
    }

    /// Read and parse an input file
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ProblemSpec, ParseError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ParseError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "Read input file");
        self.parse(&content)
    }

    /// Parse input file content into premises and the first goal
    pub fn parse(&self, content: &str) -> Result<ProblemSpec, ParseError> {
        let cleaned = strip_comments(content);

        let premises = match self.block(&cleaned, ASSUMPTIONS_HEADER, "assumptions")? {
            Some(body) => split_formulas(body),
            None => Vec::new(),
        };

        let goal = match self.block(&cleaned, GOALS_HEADER, "goals")? {
            Some(body) => {
                let mut goals = split_formulas(body);
                if goals.len() > 1 {
                    debug!(
                        ignored = goals.len() - 1,
                        "Goals block has several formulas, keeping the first"
                    );
                }
                if goals.is_empty() {
                    None
                } else {
                    Some(goals.swap_remove(0))
                }
            }
            None => None,
        };

        Ok(ProblemSpec { premises, goal })
    }

    fn block<'a>(
        &self,
        content: &'a str,
        header: &str,
        name: &str,
    ) -> Result<Option<&'a str>, ParseError> {
        match find_block(content, header) {
            BlockScan::Found(body) => Ok(Some(body)),
            BlockScan::Absent => Ok(None),
            BlockScan::Unterminated => match self.policy {
                BlockPolicy::Lenient => {
                    warn!(block = name, "Block has no end_of_list., ignoring it");
                    Ok(None)
                }
                BlockPolicy::Strict => Err(ParseError::UnterminatedBlock(name.to_string())),
            },
        }
    }
}

/// Parse content with the lenient policy
pub fn parse(content: &str) -> ProblemSpec {
    // Lenient parsing has no failure path
    Parser::new().parse(content).unwrap_or_default()
}

/// Read and parse a file with the lenient policy
pub fn parse_file(path: impl AsRef<Path>) -> Result<ProblemSpec, ParseError> {
    Parser::new().parse_file(path)
}

/// Drop comment lines, trailing comments and blank lines; trim what is left
fn strip_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| match line.find(COMMENT_MARKER) {
            Some(idx) => &line[..idx],
            None => line,
        })
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Locate the body of the first block opened by `header`.
///
/// Header and end marker match case-insensitively. The body stops at the
/// first `end_of_list.`; meeting another block header first means the
/// block was never closed.
fn find_block<'a>(content: &'a str, header: &str) -> BlockScan<'a> {
    // ASCII lowering keeps byte offsets aligned with `content`
    let lower = content.to_ascii_lowercase();
    let Some(start) = lower.find(header) else {
        return BlockScan::Absent;
    };
    let body_start = start + header.len();
    let rest = &lower[body_start..];

    match (rest.find(END_OF_LIST), rest.find(BLOCK_PREFIX)) {
        (Some(end), next) if next.map_or(true, |next| end < next) => {
            BlockScan::Found(&content[body_start..body_start + end])
        }
        _ => BlockScan::Unterminated,
    }
}

/// Split a block body on "period followed by whitespace" boundaries
fn split_formulas(body: &str) -> Vec<String> {
    let mut formulas = Vec::new();
    let mut current = String::new();
    let mut chars = body.trim().chars().peekable();

    while let Some(c) = chars.next() {
        let at_boundary = c == TERMINATOR && chars.peek().map_or(true, |n| n.is_whitespace());
        if at_boundary {
            push_fragment(&mut formulas, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_fragment(&mut formulas, &current);

    formulas
}

fn push_fragment(formulas: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    let end_marker = END_OF_LIST.trim_end_matches(TERMINATOR);
    if !fragment.is_empty() && !fragment.eq_ignore_ascii_case(end_marker) {
        formulas.push(fragment.to_string());
    }
}

// Crate-level lint configuration for pedantic clippy
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

//! Prover9/Mace4 input language support
//!
//! The LADR tools (Prover9 and Mace4) read a line-oriented input language
//! made of `formulas(...)` blocks closed by `end_of_list.`. This crate turns
//! such files into a [`ProblemSpec`] and renders a [`ProblemSpec`] back into
//! the exact text the binaries consume.
//!
//! ## Modules
//!
//! - [`parser`] - comment stripping and block extraction
//! - [`synth`] - input file rendering
//! - [`validate`] - lexical well-formedness checks on single formulas
//! - [`categorical`] - fixed axiom sets for category theory and algebra
//!
//! ## Example
//!
//! ```
//! use ladr_syntax::{parse, synthesize, ProblemSpec};
//!
//! let spec = ProblemSpec::new(vec!["man(socrates)".into()], Some("mortal(socrates)".into()));
//! let text = synthesize(&spec);
//! assert_eq!(parse(&text), spec);
//! ```

pub mod categorical;
pub mod error;
pub mod parser;
pub mod problem;
pub mod synth;
pub mod validate;

pub use error::ParseError;
pub use parser::{parse, parse_file, BlockPolicy, Parser};
pub use problem::{ProblemSpec, TERMINATOR};
pub use synth::synthesize;
pub use validate::{validate_formulas, FormulaReport, ValidationReport};

// Crate-level lint configuration for pedantic clippy
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::let_underscore_must_use)]
#![allow(clippy::return_self_not_must_use)]

//! Logic MCP server
//!
//! Exposes Prover9 theorem proving and Mace4 model search as Model Context
//! Protocol tools over a line-delimited stdio transport.
//!
//! ## Available Tools
//!
//! - `prove` - prove a conclusion from premises, or from a `.in` file
//! - `check-well-formed` - lexical validation of formulas
//! - `find-model` - finite model search
//! - `find-counterexample` - finite countermodel search
//! - `verify-commutativity` - premises and goal for a commuting diagram
//! - `get-category-axioms` - axiom sets for category theory and algebra
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ladr_backends::{EngineConfig, LogicEngine};
//! use ladr_mcp::McpServer;
//!
//! let engine = LogicEngine::new(EngineConfig::new("/opt/ladr/bin"))?;
//! Arc::new(McpServer::new(Arc::new(engine))).run_stdio().await?;
//! ```

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::McpError;
pub use protocol::{JsonRpcRequest, JsonRpcResponse, ToolCallResult};
pub use server::McpServer;
pub use tools::{Tool, ToolDefinition, ToolRegistry};

#[cfg(test)]
mod tests;

//! Logic MCP server binary
//!
//! Speaks MCP on stdin/stdout; logs go to stderr.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ladr_backends::{EngineConfig, LogicEngine};
use ladr_mcp::McpServer;
use ladr_syntax::BlockPolicy;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// MCP server for Prover9 and Mace4
#[derive(Parser, Debug)]
#[command(name = "ladr-mcp")]
#[command(about = "MCP Logic Server backed by Prover9 and Mace4")]
struct Args {
    /// Directory containing the prover9 and mace4 binaries
    #[arg(long, env = "LADR_PROVER_PATH")]
    prover_path: String,

    /// Wall-clock limit in seconds for each Prover9 run
    #[arg(long, default_value = "60", env = "LADR_TIMEOUT")]
    timeout: u64,

    /// Wall-clock limit in seconds for each Mace4 run
    #[arg(long, default_value = "60", env = "LADR_MODEL_TIMEOUT")]
    model_timeout: u64,

    /// Reject input files whose blocks lack end_of_list. instead of ignoring them
    #[arg(long, env = "LADR_STRICT_BLOCKS")]
    strict_blocks: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ladr_mcp=info,ladr_backends=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(
        "Starting Logic MCP Server with Prover9/Mace4 at: {}",
        args.prover_path
    );

    let policy = if args.strict_blocks {
        BlockPolicy::Strict
    } else {
        BlockPolicy::Lenient
    };

    let engine = match EngineConfig::from_path_str(&args.prover_path)
        .map(|config| {
            config
                .with_prover_timeout(Duration::from_secs(args.timeout))
                .with_model_timeout(Duration::from_secs(args.model_timeout))
                .with_block_policy(policy)
        })
        .and_then(LogicEngine::new)
    {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let server = Arc::new(McpServer::new(Arc::new(engine)));
    if let Err(e) = server.run_stdio().await {
        error!("Transport error: {}", e);
        std::process::exit(1);
    }
}

//! Rook Ceph MCP Server
//!
//! Serves Rook Ceph tools, manifest templates and prompts to MCP clients,
//! either as JSON-RPC over stdio or over HTTP.
//!
//! Logs always go to stderr; in stdio mode stdout carries the protocol.

use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rook_ceph_mcp_server::controlplane::DEFAULT_HTTP_ADDR;
use rook_ceph_mcp_server::{
    serve_stdio, ApiServer, ApiServerConfig, Dispatcher, Result, StoreFactory,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// How the server talks to its client
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// REST and JSON-RPC over HTTP
    Http,
}

/// Rook Ceph MCP Server - Model Context Protocol access to Rook Ceph resources
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transport to serve
    #[arg(long, env = "MCP_TRANSPORT", value_enum, default_value = "stdio")]
    transport: Transport,

    /// HTTP bind address (http transport only)
    #[arg(long, env = "MCP_HTTP_ADDR", default_value = DEFAULT_HTTP_ADDR)]
    http_addr: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    /// Run in standalone mode (in-memory store, no Kubernetes)
    #[arg(long, env = "STANDALONE")]
    standalone: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    info!("Starting Rook Ceph MCP Server");
    info!("  Version: {}", rook_ceph_mcp_server::VERSION);
    info!("  Transport: {:?}", args.transport);
    info!("  Standalone mode: {}", args.standalone);

    let store = StoreFactory::connect(args.standalone).await?;
    let dispatcher = Dispatcher::new(store)?;

    match args.transport {
        Transport::Stdio => serve_stdio(dispatcher).await?,
        Transport::Http => run_http(&args, dispatcher).await?,
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn run_http(args: &Args, dispatcher: Dispatcher) -> Result<()> {
    let config = ApiServerConfig::from_addr(&args.http_addr)?;
    let server = Arc::new(ApiServer::new(config, dispatcher));

    let signal_server = server.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                signal_server.shutdown();
            }
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    server.run().await
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG overrides the level flag entirely
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},hyper=warn,kube=info,tower=warn,axum=info",
            level
        ))
    });

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

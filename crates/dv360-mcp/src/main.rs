//! DV360 MCP - Display & Video 360 tools over the Model Context Protocol

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod server;
mod types;

use commands::{check_command, serve_command};

/// DV360 MCP - reporting and entity tools for AI agents
#[derive(Parser)]
#[command(name = "dv360-mcp")]
#[command(about = "◆ Display & Video 360 MCP tool server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Partner ID used when list_advertisers is called without one
    #[arg(long, global = true, env = "DV360_PARTNER_ID")]
    partner_id: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve tools over stdio (default)
    Serve,
    /// Validate credentials and exit
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries the MCP transport
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve_command(cli.partner_id).await {
                error!("Failed to initialize server: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Check => {
            if let Err(e) = check_command(cli.partner_id).await {
                error!("Check failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

//! DV360 MCP command implementations

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use tracing::info;

use dv360_client::LazyClient;
use dv360_config::Config;

use crate::server::McpServer;

/// Load `.env` and the process environment, then apply CLI overrides
fn load_config(partner_id: Option<String>) -> Config {
    let config = Config::from_env();
    match partner_id {
        Some(partner_id) => config.with_partner_id(partner_id),
        None => config,
    }
}

/// Build the shared client and authenticate once, failing fast on bad
/// credentials
async fn connect(partner_id: Option<String>) -> Result<Arc<LazyClient>> {
    let client = Arc::new(LazyClient::new(load_config(partner_id)));
    client
        .initialize()
        .await
        .context("credential validation failed")?;
    Ok(client)
}

/// Validate credentials, then answer MCP requests on stdin/stdout until the
/// client disconnects
pub async fn serve_command(partner_id: Option<String>) -> Result<()> {
    info!("Initializing DV360 MCP Server...");
    let client = connect(partner_id).await?;
    info!("DV360 MCP Server initialized successfully");

    let server = McpServer::from_client(client);
    let running = server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP stdio transport")?;
    running.waiting().await?;
    info!("MCP client disconnected");

    Ok(())
}

/// Print credential status
pub async fn check_command(partner_id: Option<String>) -> Result<()> {
    println!("◆ DV360 MCP Status");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let client = connect(partner_id).await?;
    let config = client.config();
    let key = config.service_account_key()?;

    println!("Service account: {} [OK]", key.client_email);
    println!(
        "Project:         {}",
        key.project_id.as_deref().unwrap_or("[Unknown]")
    );
    println!(
        "Partner ID:      {}",
        config.partner_id.as_deref().unwrap_or("[Not set]")
    );

    println!("\n◆ Ready");

    Ok(())
}

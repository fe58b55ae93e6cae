use std::sync::Arc;

use amadeus_mcp::config::Cli;
use amadeus_mcp::{Dispatcher, ServerConfig, ToolRegistry, build_service, transport};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from(Cli::parse());

    // Logs go to stderr; stdout belongs to the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let service = build_service(&config)?;
    let registry = ToolRegistry::with_travel_tools(service)?;
    tracing::info!("Registered {} tools", registry.list_tools().len());

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry)));
    if config.http.enabled {
        transport::http::serve(dispatcher, &config.http).await?;
    } else {
        transport::stdio::run(&dispatcher).await?;
    }
    Ok(())
}

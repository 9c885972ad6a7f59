use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wikidata_mcp::prelude::*;

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> Result<(), WikidataError> {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let tools = WikidataTools::from_config(&config).await?;
    let server = McpServer::new(tools);
    info!(
        tools = server.tool_count(),
        api = config.api_url(),
        "serving Wikidata tools on stdio"
    );
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}

use std::path::PathBuf;

use mock_provider::{Ledger, PactFile};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pact_path = PathBuf::from(std::env::var("PACT_FILE").map_err(|_| "PACT_FILE is not set")?);
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());

    let interactions = PactFile::load(&pact_path)?.into_interactions();
    let count = interactions.len();

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, pact = %pact_path.display(), interactions = count, "replaying pact");
    mock_provider::run(listener, Ledger::new(interactions)).await?;
    Ok(())
}

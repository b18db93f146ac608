mod config;
mod external;
mod routes;

use std::sync::Arc;

use stock_index::StockBook;
use tokio::main;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::external::AlphaVantageClient;
use crate::routes::AppState;

#[main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    let source = AlphaVantageClient::new(&config.alpha_vantage)?;

    // One index per process, owned here and handed to every request.
    let state = AppState {
        book: StockBook::new(),
        source: Arc::new(source),
    };

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, upstream = %config.alpha_vantage.base_url, "stock index listening");
    axum::serve(listener, app).await?;
    Ok(())
}

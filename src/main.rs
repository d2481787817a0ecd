use std::net::SocketAddr;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use stock_pulse::config::RankingsConfig;
use stock_pulse::routes;
use stock_pulse::state::AppState;
use stock_pulse::stocks::YahooProvider;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RankingsConfig::from_env();
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .wrap_err("invalid bind address")?;

    tracing::info!(
        tickers = config.tickers.len(),
        range = %config.window.range,
        interval = %config.window.interval,
        "ranking configured tickers"
    );

    let provider = Arc::new(YahooProvider::new()?);
    let app = routes::app(AppState::new(config, provider));

    tracing::info!("stock-pulse listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(why) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {why}");
        return;
    }
    tracing::info!("shutdown signal received");
}

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chess_rooms::server::app::{self, AppState};
use chess_rooms::server::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_new(&config.log_filter)?)
        .init();

    config.validate()?;
    let addr = config.socket_addr()?;
    let heartbeat = config.heartbeat_interval()?;

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, heartbeat_secs = heartbeat.as_secs(), "chess rooms listening");

    app::serve(listener, AppState::new(), heartbeat, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

//! Router assembly, the heartbeat sweep task, and the serve loop.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{any, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::server::{http_api, websocket};
use crate::session::connection_monitor::ConnectionMonitor;
use crate::session::coordinator::SessionCoordinator;

/// The process-wide registries, shared by every handler.
#[derive(Clone, Default)]
pub struct AppState {
    pub coordinator: Arc<SessionCoordinator>,
    pub monitor: Arc<ConnectionMonitor>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(websocket::upgrade))
        .route("/ws", get(websocket::upgrade))
        .route("/api/connect", post(http_api::connect))
        .route("/api/{*rest}", any(http_api::not_found))
        .with_state(state)
}

/// Runs a heartbeat sweep every `interval`, disconnecting whoever it terminates.
pub fn spawn_heartbeat(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let terminated = state.monitor.sweep();
            debug!(
                tracked = state.monitor.len(),
                terminated = terminated.len(),
                "heartbeat sweep"
            );
            for connection in terminated {
                state.coordinator.disconnect(connection);
            }
        }
    })
}

pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    heartbeat: Duration,
    shutdown: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let heartbeat_task = spawn_heartbeat(state.clone(), heartbeat);
    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await;
    heartbeat_task.abort();
    info!("server stopped");
    result
}

//! Demo MCP tool server speaking JSON-RPC over streamable HTTP.
//!
//! Serves `current_time` and `get_weather` on a single POST endpoint. Used as
//! the counterpart of `relay-mcp` in end-to-end tests and for local runs of
//! the `relay` CLI.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod tools;

use axum::{routing::post, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::{Config, ResultShape, ServerConfig};
pub use state::AppState;

use handlers::mcp;

pub fn build_router(state: AppState) -> Router {
    let path = state.config.path.clone();
    Router::new()
        .route(
            &path,
            post(mcp::http_post).get(mcp::http_get).delete(mcp::http_delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until the task is dropped
pub async fn serve(listener: TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    let path = config.path.clone();
    let app = build_router(AppState::new(config));

    tracing::info!(addr = %listener.local_addr()?, path = %path, "starting MCP HTTP server");
    axum::serve(listener, app).await?;
    Ok(())
}

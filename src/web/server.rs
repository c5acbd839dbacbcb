//! Web server for the adjacency list page
//!
//! Provides an HTTP server using Axum bound to localhost.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::DEFAULT_PORT;
use crate::dataset::FieldPair;

use super::routes;

/// Shared application state.
///
/// Immutable; handlers rebuild everything they need from the input file.
#[derive(Debug, Clone)]
pub struct AppState {
    pub input: PathBuf,
    pub fields: FieldPair,
}

/// Configuration for the web server
pub struct ServerConfig {
    pub port: u16,
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            open_browser: false,
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .with_state(Arc::new(state))
}

/// Start the web server and serve the adjacency list
pub async fn start_server(
    state: AppState,
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let input = state.input.clone();
    let router = app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;

    let url = format!("http://127.0.0.1:{}/", config.port);
    tracing::info!(%url, input = %input.display(), "web server listening");
    eprintln!("Serving '{}' at {}", input.display(), url);

    if config.open_browser {
        eprintln!("Opening browser...");
        if let Err(e) = open::that(&url) {
            eprintln!("Warning: Could not open browser: {}", e);
            eprintln!("Please open {} manually", url);
        }
    }

    eprintln!("Press Ctrl+C to stop the server");

    axum::serve(listener, router).await?;

    Ok(())
}

//! HTTP routes for the web surface

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::graph::build_graph;
use crate::report::render_graph_page;

use super::server::AppState;

/// Create page routes
pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// GET / - Adjacency list built from the current contents of the input file
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let graph = match build_graph(&state.input, &state.fields) {
        Ok(graph) => graph,
        Err(e) => {
            tracing::warn!(input = %state.input.display(), error = %e, "input unavailable");
            return (
                StatusCode::NOT_FOUND,
                format!(
                    "Error: could not find or read {}",
                    state.input.display()
                ),
            )
                .into_response();
        }
    };

    let view = graph.grouped_adjacencies();
    tracing::info!(tiers = view.groups.len(), "rendered adjacency list");
    Html(render_graph_page(&view)).into_response()
}

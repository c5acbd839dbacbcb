//! Web surface for the adjacency list
//!
//! Serves a single server-rendered page at `/`. The input file is re-read on
//! every request, so edits to the CSV show up on reload.

pub mod routes;
pub mod server;

pub use server::{AppState, ServerConfig, start_server};

//! Axum-based HTTP server exposing the OVH metrics.
//!
//! # Components
//!
//! - `handlers`: `/metrics` (one scrape per request) and `/health`.
//! - `middleware`: request ID tracking and optional HTTP basic auth.
//! - `routes`: the router tying handlers and layers together.
//! - `tls`: HTTPS serving through `axum-server` and rustls.

mod handlers;
mod middleware;
mod routes;
mod tls;

pub use routes::{create_router, AppState};
pub use tls::{rustls_config, serve_tls};

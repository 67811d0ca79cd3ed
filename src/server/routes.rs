// HTTP routes configuration
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use super::handlers::{health_handler, metrics_handler};
use super::middleware::{basic_auth, request_id_layers};
use crate::collector::OvhCollector;
use crate::config::AppConfig;
use crate::error::Result;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub collector: Arc<OvhCollector>,
}

pub fn create_router(config: AppConfig, collector: OvhCollector) -> Result<Router> {
    let state = AppState {
        config: Arc::new(config),
        collector: Arc::new(collector),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(from_fn_with_state(state.clone(), basic_auth))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}

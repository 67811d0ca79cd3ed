// HTTP request handlers
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use super::routes::AppState;
use crate::collector::encodable;
use crate::error::{ExporterError, Result};
use crate::metrics::gather_metrics;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub checks: HashMap<String, HealthCheck>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

/// Liveness plus a summary of what a scrape would cover. No API call.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    let services = state.collector.services().len();
    let services_check = if services == 0 {
        overall_status = HealthStatus::Degraded;
        HealthCheck {
            status: "warning".to_string(),
            message: "No service configured".to_string(),
        }
    } else {
        HealthCheck {
            status: "ok".to_string(),
            message: format!("{} service(s) configured", services),
        }
    };
    checks.insert("services".to_string(), services_check);

    let consumer_key_check = if state.config.ovh.consumer_key.is_some() {
        HealthCheck {
            status: "ok".to_string(),
            message: format!("Endpoint: {}", state.config.ovh.endpoint),
        }
    } else {
        overall_status = HealthStatus::Degraded;
        HealthCheck {
            status: "warning".to_string(),
            message: "No consumer key, run `ovh-exporter login`".to_string(),
        }
    };
    checks.insert("credentials".to_string(), consumer_key_check);

    Json(HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    })
}

/// Scrape every project and expose the result in Prometheus text format,
/// followed by the exporter's own metrics.
pub async fn metrics_handler(State(state): State<AppState>) -> Result<Response> {
    let families = state.collector.collect().await;

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&encodable(&families), &mut buffer)
        .map_err(|e| ExporterError::Internal(format!("Failed to encode metrics: {}", e)))?;

    let mut body = String::from_utf8(buffer)
        .map_err(|e| ExporterError::Internal(format!("Metrics are not UTF-8: {}", e)))?;
    body.push_str(&gather_metrics());

    Ok((
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        body,
    )
        .into_response())
}

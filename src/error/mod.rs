// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("OVH API error on {path} (HTTP {status}): {message}")]
    Api {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExporterError {
    /// Build an [`ExporterError::Api`] from a non-success OVH response body.
    ///
    /// OVH error bodies look like `{"class": "...", "message": "..."}`; the
    /// raw body is kept when it does not parse.
    pub fn api(path: &str, status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.to_string());

        ExporterError::Api {
            path: path.to_string(),
            status,
            message,
        }
    }
}

// Convert ExporterError to HTTP responses for Axum
impl IntoResponse for ExporterError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ExporterError::Unauthorized => (StatusCode::UNAUTHORIZED, "authentication_error"),
            ExporterError::Api { .. } | ExporterError::Http(_) | ExporterError::Decode { .. } => {
                (StatusCode::BAD_GATEWAY, "api_error")
            }
            ExporterError::Config(_) | ExporterError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;

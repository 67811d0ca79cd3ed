// Exporter self-telemetry
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

mod registry;

pub use registry::{gather_metrics, API_REQUESTS, PROJECT_SCRAPE_ERRORS, REGISTRY, SCRAPE_DURATION};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PROJECT_ID: Regex = Regex::new(r"/[a-f0-9]{32}(/|$)").unwrap();
}

/// Count one OVH API call.
pub fn record_api_request(path: &str, status: u16) {
    API_REQUESTS
        .with_label_values(&[&path_kind(path), &status.to_string()])
        .inc();
}

pub fn record_project_failure(service_id: &str) {
    PROJECT_SCRAPE_ERRORS.with_label_values(&[service_id]).inc();
}

pub fn observe_scrape_duration(seconds: f64) {
    SCRAPE_DURATION.observe(seconds);
}

/// API path with the query string dropped and project ids folded, so the
/// label stays bounded whatever the number of projects.
pub fn path_kind(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    PROJECT_ID.replace_all(path, "/{id}$1").into_owned()
}

// Self-telemetry registry
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_with_registry, CounterVec, Encoder,
    Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Exporter's own metrics. Never mixed with the per-scrape OVH families.
    pub static ref REGISTRY: Registry = Registry::new();

    /// OVH API calls by path shape and HTTP status
    pub static ref API_REQUESTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("ovh_exporter_api_requests_total", "Total OVH API requests"),
        &["path_kind", "status"],
        REGISTRY
    ).unwrap();

    /// Wall time of a full scrape, all projects included
    pub static ref SCRAPE_DURATION: Histogram = register_histogram_with_registry!(
        HistogramOpts::new("ovh_exporter_scrape_duration_seconds", "Scrape duration in seconds")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        REGISTRY
    ).unwrap();

    pub static ref PROJECT_SCRAPE_ERRORS: CounterVec = register_counter_vec_with_registry!(
        Opts::new(
            "ovh_exporter_project_scrape_errors_total",
            "Total projects that could not be scraped"
        ),
        &["service_id"],
        REGISTRY
    ).unwrap();
}

/// Encode the self-telemetry registry in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode exporter metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        SCRAPE_DURATION.observe(0.2);
        let metrics = gather_metrics();
        assert!(metrics.contains("ovh_exporter_scrape_duration_seconds"));
    }
}

// Project label composition
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use crate::config::ServiceConfig;
use crate::error::{ExporterError, Result};

/// Builds the label values of every observation emitted for a project.
///
/// A label tuple is the project's static label values, the project id,
/// then the category-specific values.
///
/// Static labels come out sorted by label name, not in the order they are
/// written in the configuration file: the configuration loader does not
/// keep key order, so sorting is what makes the schema stable across
/// restarts. Prometheus matches labels by name, so queries are unaffected.
#[derive(Debug, Clone, Default)]
pub struct LabelComposer {
    names: Vec<String>,
}

impl LabelComposer {
    /// Fails when two services declare different label name sets.
    pub fn new(services: &[ServiceConfig]) -> Result<Self> {
        let Some(first) = services.first() else {
            return Ok(Self::default());
        };

        let names: Vec<String> = first.labels.keys().cloned().collect();
        for service in services {
            if !service.labels.keys().eq(names.iter()) {
                return Err(ExporterError::Config(format!(
                    "Service label names must be the same for all services ({} declares {:?}, expected {:?})",
                    service.id,
                    service.labels.keys().collect::<Vec<_>>(),
                    names
                )));
            }
        }

        Ok(Self { names })
    }

    /// Project label names, in the order their values are emitted.
    pub fn label_names(&self) -> &[String] {
        &self.names
    }

    pub fn compose(&self, service: &ServiceConfig, tail: &[&str]) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.names.len() + 1 + tail.len());
        labels.extend(
            self.names
                .iter()
                .map(|name| service.labels.get(name).cloned().unwrap_or_default()),
        );
        labels.push(service.id.clone());
        labels.extend(tail.iter().map(|v| v.to_string()));
        labels
    }
}

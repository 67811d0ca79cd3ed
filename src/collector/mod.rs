// OVH public cloud collector
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

//! Turns per-project OVH snapshots into Prometheus gauge families.
//!
//! Every [`OvhCollector::collect`] builds a fresh [`Metrics`] registry, so
//! nothing observed in one scrape leaks into the next.

mod catalogue;
mod labels;
mod mappers;
mod registry;

pub use catalogue::{Category, FamilySpec, CATALOGUE, ENGINE_LABEL_NAMES, SERVICE_ID_LABEL};
pub use labels::LabelComposer;
pub use mappers::{map_snapshot, ProjectScope, MONTHLY_INSTANCE_HOURS};
pub use registry::{encodable, GaugeFamily, Metrics, Observation};

use crate::config::ServiceConfig;
use crate::error::{ExporterError, Result};
use crate::metrics;
use crate::ovh::{fetch_snapshot, AccountClient};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Result of one scrape: the families plus the projects that failed.
#[derive(Debug)]
pub struct Scrape {
    pub families: Vec<GaugeFamily>,
    pub failures: Vec<(String, ExporterError)>,
}

pub struct OvhCollector {
    client: Arc<dyn AccountClient>,
    services: Vec<ServiceConfig>,
    composer: LabelComposer,
}

impl OvhCollector {
    /// Fails when services do not share the same label names.
    pub fn new(client: Arc<dyn AccountClient>, services: Vec<ServiceConfig>) -> Result<Self> {
        let composer = LabelComposer::new(&services)?;
        Ok(Self {
            client,
            services,
            composer,
        })
    }

    pub fn services(&self) -> &[ServiceConfig] {
        &self.services
    }

    pub fn label_names(&self) -> &[String] {
        self.composer.label_names()
    }

    /// Every family with its schema and no observation. No network call.
    pub fn describe(&self) -> Vec<GaugeFamily> {
        Metrics::new(self.composer.label_names()).into_families()
    }

    /// Run one scrape over every configured project.
    ///
    /// A failing project is logged and leaves no observation behind; the
    /// other projects are still reported.
    pub async fn collect(&self) -> Vec<GaugeFamily> {
        self.scrape().await.families
    }

    /// Same as [`collect`](Self::collect), also returning the failures.
    pub async fn scrape(&self) -> Scrape {
        let started = Instant::now();
        let client = self.client.as_ref();

        let snapshots = join_all(
            self.services
                .iter()
                .map(|service| fetch_snapshot(client, &service.id)),
        )
        .await;

        let mut registry = Metrics::new(self.composer.label_names());
        let mut failures = Vec::new();

        for (service, snapshot) in self.services.iter().zip(snapshots) {
            match snapshot {
                Ok(snapshot) => {
                    let scope = ProjectScope {
                        composer: &self.composer,
                        service,
                    };
                    map_snapshot(&mut registry, &scope, &snapshot);
                }
                Err(e) => {
                    error!(service_id = %service.id, "Failed to collect project: {}", e);
                    metrics::record_project_failure(&service.id);
                    failures.push((service.id.clone(), e));
                }
            }
        }

        let elapsed = started.elapsed();
        metrics::observe_scrape_duration(elapsed.as_secs_f64());
        debug!(
            projects = self.services.len(),
            failed = failures.len(),
            "Scrape done in {:?}",
            elapsed
        );

        Scrape {
            families: registry.into_families(),
            failures,
        }
    }
}

// Snapshot to gauge family mapping
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use super::catalogue::{Category, CATALOGUE};
use super::labels::LabelComposer;
use super::registry::Metrics;
use crate::config::ServiceConfig;
use crate::ovh::models::{
    Charge, CurrentUsage, QuotaEntry, QuotaSection, StorageContainer, Volume,
};
use crate::ovh::Snapshot;
use tracing::warn;

/// Hours billed for a monthly instance, whatever the payload says.
pub const MONTHLY_INSTANCE_HOURS: f64 = 720.0;

/// Storage name reported for `pcs` usage, which is not split per bucket.
const ALL_CONTAINERS: &str = "__all__";

/// The project a mapper is emitting observations for.
pub struct ProjectScope<'a> {
    pub composer: &'a LabelComposer,
    pub service: &'a ServiceConfig,
}

impl ProjectScope<'_> {
    fn labels(&self, tail: &[&str]) -> Vec<String> {
        self.composer.compose(self.service, tail)
    }
}

/// Run every mapper over one project's snapshot.
pub fn map_snapshot(metrics: &mut Metrics, scope: &ProjectScope<'_>, snapshot: &Snapshot) {
    collect_volumes(metrics, scope, &snapshot.volumes);
    for category in [
        Category::VolumeQuota,
        Category::InstanceQuota,
        Category::NetworkQuota,
        Category::LoadBalancerQuota,
        Category::KeymanagerQuota,
    ] {
        collect_quota(metrics, scope, &snapshot.quotas, category);
    }
    collect_storages(metrics, scope, &snapshot.storages);
    collect_instance_usage(metrics, scope, &snapshot.usage);
    collect_volume_usage(metrics, scope, &snapshot.usage);
    collect_storage_usage(metrics, scope, &snapshot.usage);
}

/// One observation per volume; volumes without a usable size are skipped.
pub fn collect_volumes(metrics: &mut Metrics, scope: &ProjectScope<'_>, volumes: &[Volume]) {
    for volume in volumes {
        let Some(size) = volume.size_gb() else {
            warn!(
                service_id = %scope.service.id,
                "Volume {} ignored as size is missing",
                volume.id
            );
            continue;
        };

        metrics.add(
            "ovh_volume_size_gb",
            scope.labels(&[
                volume.id.as_str(),
                volume.name.as_str(),
                volume.region.as_str(),
                volume.volume_type.as_str(),
            ]),
            size as f64,
        );
    }
}

fn quota_section(entry: &QuotaEntry, category: Category) -> Option<&QuotaSection> {
    match category {
        Category::InstanceQuota => entry.instance.as_ref(),
        Category::VolumeQuota => entry.volume.as_ref(),
        Category::NetworkQuota => entry.network.as_ref(),
        Category::LoadBalancerQuota => entry.load_balancer.as_ref(),
        Category::KeymanagerQuota => entry.keymanager.as_ref(),
        _ => None,
    }
}

/// Emit every family of a quota `category` for the entries carrying it.
///
/// An entry without the category contributes nothing to it. A counter
/// missing from a present category is skipped with a warning.
pub fn collect_quota(
    metrics: &mut Metrics,
    scope: &ProjectScope<'_>,
    quotas: &[QuotaEntry],
    category: Category,
) {
    debug_assert!(category.is_quota());

    for entry in quotas {
        let Some(section) = quota_section(entry, category) else {
            continue;
        };

        for spec in CATALOGUE.iter().filter(|s| s.category == category) {
            let value = spec
                .fields
                .iter()
                .find_map(|field| section.get(*field).and_then(|v| v.as_f64()));

            match value {
                Some(value) => metrics.add(spec.name, scope.labels(&[entry.region.as_str()]), value),
                None => warn!(
                    service_id = %scope.service.id,
                    region = %entry.region,
                    "Quota {} ignored as {} is missing",
                    spec.name,
                    spec.fields.join("/")
                ),
            }
        }
    }
}

/// Size and object count of every storage container.
pub fn collect_storages(
    metrics: &mut Metrics,
    scope: &ProjectScope<'_>,
    storages: &[StorageContainer],
) {
    for storage in storages {
        let labels = scope.labels(&[
            storage.region.as_str(),
            storage.id.as_str(),
            storage.name.as_str(),
            storage.container_type.as_deref().unwrap_or_default(),
        ]);
        metrics.add("ovh_storage_size_bytes", labels.clone(), storage.stored_bytes);
        metrics.add("ovh_storage_object_count", labels, storage.stored_objects);
    }
}

/// Hourly and monthly instance usage, told apart by the `type` label.
///
/// Hourly hours come from the detail record; monthly instances always
/// count [`MONTHLY_INSTANCE_HOURS`].
pub fn collect_instance_usage(
    metrics: &mut Metrics,
    scope: &ProjectScope<'_>,
    usage: &CurrentUsage,
) {
    if let Some(hourly) = &usage.hourly_usage {
        for group in &hourly.instance {
            for instance in &group.details {
                let hours = instance.quantity.as_ref().map_or(0.0, |q| q.value);
                let labels = scope.labels(&[
                    group.region.as_str(),
                    instance.instance_id.as_str(),
                    "hourly",
                    group.reference.as_str(),
                ]);
                metrics.add("ovh_usage_instance_hours", labels.clone(), hours);
                metrics.add("ovh_usage_instance_price", labels, instance.total_price);
            }
        }
    }

    if let Some(monthly) = &usage.monthly_usage {
        for group in &monthly.instance {
            for instance in &group.details {
                let labels = scope.labels(&[
                    group.region.as_str(),
                    instance.instance_id.as_str(),
                    "monthly",
                    group.reference.as_str(),
                ]);
                metrics.add("ovh_usage_instance_hours", labels.clone(), MONTHLY_INSTANCE_HOURS);
                metrics.add("ovh_usage_instance_price", labels, instance.total_price);
            }
        }
    }
}

/// Hourly volume usage in GB x hours, per volume.
pub fn collect_volume_usage(metrics: &mut Metrics, scope: &ProjectScope<'_>, usage: &CurrentUsage) {
    let Some(hourly) = &usage.hourly_usage else {
        return;
    };

    for group in &hourly.volume {
        for volume in &group.details {
            let gb_hours = volume.quantity.as_ref().map_or(0.0, |q| q.value);
            let labels = scope.labels(&[
                group.region.as_str(),
                volume.volume_id.as_str(),
                group.volume_type.as_str(),
            ]);
            metrics.add("ovh_usage_volume_gb_hours", labels.clone(), gb_hours);
            metrics.add("ovh_usage_volume_price", labels, volume.total_price);
        }
    }
}

/// Hourly object storage usage.
///
/// Entries with a zero or absent total price are not billed this period
/// and are skipped. A missing bandwidth direction reports `0` for both its
/// quantity and its price.
pub fn collect_storage_usage(
    metrics: &mut Metrics,
    scope: &ProjectScope<'_>,
    usage: &CurrentUsage,
) {
    let Some(hourly) = &usage.hourly_usage else {
        return;
    };

    for storage in &hourly.storage {
        match storage.total_price {
            Some(price) if price != 0.0 => {}
            _ => continue,
        }

        let storage_name = if storage.storage_type == "pcs" {
            ALL_CONTAINERS
        } else {
            storage.bucket_name.as_deref().unwrap_or_default()
        };
        let labels = scope.labels(&[storage.region.as_str(), storage.storage_type.as_str(), storage_name]);

        let stored = storage.stored.clone().unwrap_or_default();
        metrics.add("ovh_usage_storage_gb_hours", labels.clone(), stored.amount());
        metrics.add("ovh_usage_storage_price", labels.clone(), stored.total_price);

        let directions: [(&Option<Charge>, &str, &str); 4] = [
            (
                &storage.incoming_bandwidth,
                "ovh_usage_storage_bandwidth_external_incoming_gb",
                "ovh_usage_storage_bandwidth_external_incoming_price",
            ),
            (
                &storage.outgoing_bandwidth,
                "ovh_usage_storage_bandwidth_external_outgoing_gb",
                "ovh_usage_storage_bandwidth_external_outgoing_price",
            ),
            (
                &storage.incoming_internal_bandwidth,
                "ovh_usage_storage_bandwidth_internal_incoming_gb",
                "ovh_usage_storage_bandwidth_internal_incoming_price",
            ),
            (
                &storage.outgoing_internal_bandwidth,
                "ovh_usage_storage_bandwidth_internal_outgoing_gb",
                "ovh_usage_storage_bandwidth_internal_outgoing_price",
            ),
        ];

        for (charge, gb_family, price_family) in directions {
            let (gb, price) = charge
                .as_ref()
                .map_or((0.0, 0.0), |c| (c.amount(), c.total_price));
            metrics.add(gb_family, labels.clone(), gb);
            metrics.add(price_family, labels.clone(), price);
        }
    }
}

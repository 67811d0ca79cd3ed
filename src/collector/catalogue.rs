// Gauge family catalogue
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

/// Which mapper feeds a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Volume,
    InstanceQuota,
    VolumeQuota,
    NetworkQuota,
    LoadBalancerQuota,
    KeymanagerQuota,
    Storage,
    InstanceUsage,
    VolumeUsage,
    StorageUsage,
}

impl Category {
    pub fn is_quota(self) -> bool {
        matches!(
            self,
            Category::InstanceQuota
                | Category::VolumeQuota
                | Category::NetworkQuota
                | Category::LoadBalancerQuota
                | Category::KeymanagerQuota
        )
    }
}

/// Static description of one gauge family.
#[derive(Debug)]
pub struct FamilySpec {
    pub name: &'static str,
    pub help: &'static str,
    /// Category labels, appended after the project labels and `service_id`.
    pub labels: &'static [&'static str],
    pub category: Category,
    /// Quota families only: API field names holding the value, first match wins.
    pub fields: &'static [&'static str],
}

pub const SERVICE_ID_LABEL: &str = "service_id";

const VOLUME_LABELS: &[&str] = &["volume_id", "name", "region", "type"];
const QUOTA_LABELS: &[&str] = &["region"];
const STORAGE_LABELS: &[&str] = &["region", "storage_id", "storage_name", "storage_type"];
const INSTANCE_USAGE_LABELS: &[&str] = &["region", "instance_id", "type", "flavor"];
const VOLUME_USAGE_LABELS: &[&str] = &["region", "volume_id", "flavor"];
const STORAGE_USAGE_LABELS: &[&str] = &["region", "flavor", "storage_name"];

/// Every label name the exporter sets itself; project labels may not reuse them.
pub const ENGINE_LABEL_NAMES: &[&str] = &[
    SERVICE_ID_LABEL,
    "region",
    "volume_id",
    "name",
    "type",
    "storage_id",
    "storage_name",
    "storage_type",
    "instance_id",
    "flavor",
];

const fn quota(
    name: &'static str,
    help: &'static str,
    category: Category,
    fields: &'static [&'static str],
) -> FamilySpec {
    FamilySpec {
        name,
        help,
        labels: QUOTA_LABELS,
        category,
        fields,
    }
}

const fn family(
    name: &'static str,
    help: &'static str,
    labels: &'static [&'static str],
    category: Category,
) -> FamilySpec {
    FamilySpec {
        name,
        help,
        labels,
        category,
        fields: &[],
    }
}

use Category::*;

/// All families, in exposition order.
pub static CATALOGUE: &[FamilySpec] = &[
    // Instance quota
    quota("ovh_quota_instance_count", "Instance count", InstanceQuota, &["usedInstances"]),
    quota("ovh_quota_instance_max_count", "Instance max count", InstanceQuota, &["maxInstances"]),
    quota("ovh_quota_cpu_count", "CPU count", InstanceQuota, &["usedCores"]),
    quota("ovh_quota_cpu_max_count", "CPU max count", InstanceQuota, &["maxCores"]),
    quota("ovh_quota_ram_gb", "RAM count", InstanceQuota, &["usedRAM"]),
    quota("ovh_quota_ram_max_gb", "RAM max count", InstanceQuota, &["maxRam", "maxRAM"]),
    // Volume quota
    quota("ovh_quota_volume_gb", "Volume gigabytes", VolumeQuota, &["usedGigabytes"]),
    quota("ovh_quota_volume_max_gb", "Volume max gigabytes", VolumeQuota, &["maxGigabytes"]),
    quota("ovh_quota_volume_count", "Volume count", VolumeQuota, &["volumeCount"]),
    quota("ovh_quota_volume_max_count", "Volume max count", VolumeQuota, &["maxVolumeCount"]),
    quota("ovh_quota_volume_backup_gb", "Volume backup gigabytes", VolumeQuota, &["usedBackupGigabytes"]),
    quota("ovh_quota_volume_backup_max_gb", "Volume backup max gigabytes", VolumeQuota, &["maxBackupGigabytes"]),
    quota("ovh_quota_volume_backup_count", "Volume backup count", VolumeQuota, &["volumeBackupCount"]),
    quota("ovh_quota_volume_backup_max_count", "Volume backup max count", VolumeQuota, &["maxVolumeBackupCount"]),
    // Network quota
    quota("ovh_quota_network_count", "Network count", NetworkQuota, &["usedNetworks"]),
    quota("ovh_quota_network_max_count", "Network max count", NetworkQuota, &["maxNetworks"]),
    quota("ovh_quota_network_subnet_count", "Network subnet count", NetworkQuota, &["usedSubnets"]),
    quota("ovh_quota_network_subnet_max_count", "Network subnet max count", NetworkQuota, &["maxSubnets"]),
    quota("ovh_quota_network_floating_ip_count", "Network floating IP count", NetworkQuota, &["usedFloatingIPs"]),
    quota("ovh_quota_network_floating_ip_max_count", "Network floating IP max count", NetworkQuota, &["maxFloatingIPs"]),
    quota("ovh_quota_network_gateway_count", "Network gateway count", NetworkQuota, &["usedGateways"]),
    quota("ovh_quota_network_gateway_max_count", "Network gateway max count", NetworkQuota, &["maxGateways"]),
    // Load balancer quota
    quota(
        "ovh_quota_load_balancer_count",
        "Load balancer count",
        LoadBalancerQuota,
        &["usedLoadBalancers", "usedLoadbalancers"],
    ),
    quota(
        "ovh_quota_load_balancer_max_count",
        "Load balancer max count",
        LoadBalancerQuota,
        &["maxLoadBalancers", "maxLoadbalancers"],
    ),
    // Key manager quota
    quota("ovh_quota_keymanager_secret_count", "Key manager count", KeymanagerQuota, &["usedSecrets"]),
    quota("ovh_quota_keymanager_secret_max_count", "Key manager max count", KeymanagerQuota, &["maxSecrets"]),
    // Inventory
    family("ovh_volume_size_gb", "Volume size in Gb", VOLUME_LABELS, Volume),
    family("ovh_storage_object_count", "Storage object count", STORAGE_LABELS, Storage),
    family("ovh_storage_size_bytes", "Storage size in bytes", STORAGE_LABELS, Storage),
    // Instance and volume usage
    family("ovh_usage_instance_hours", "Instance usage in hours", INSTANCE_USAGE_LABELS, InstanceUsage),
    family("ovh_usage_instance_price", "Instance usage price", INSTANCE_USAGE_LABELS, InstanceUsage),
    family("ovh_usage_volume_gb_hours", "Volume usage in gb x hours", VOLUME_USAGE_LABELS, VolumeUsage),
    family("ovh_usage_volume_price", "Volume usage price", VOLUME_USAGE_LABELS, VolumeUsage),
    // Storage usage
    family("ovh_usage_storage_price", "Storage usage price", STORAGE_USAGE_LABELS, StorageUsage),
    family("ovh_usage_storage_gb_hours", "Storage usage in gb x hours", STORAGE_USAGE_LABELS, StorageUsage),
    family(
        "ovh_usage_storage_bandwidth_internal_outgoing_price",
        "Storage usage internal outgoing bandwidth price",
        STORAGE_USAGE_LABELS,
        StorageUsage,
    ),
    family(
        "ovh_usage_storage_bandwidth_internal_outgoing_gb",
        "Storage usage internal outgoing bandwidth in gb",
        STORAGE_USAGE_LABELS,
        StorageUsage,
    ),
    family(
        "ovh_usage_storage_bandwidth_internal_incoming_price",
        "Storage usage internal incoming bandwidth price",
        STORAGE_USAGE_LABELS,
        StorageUsage,
    ),
    family(
        "ovh_usage_storage_bandwidth_internal_incoming_gb",
        "Storage usage internal incoming bandwidth in gb",
        STORAGE_USAGE_LABELS,
        StorageUsage,
    ),
    family(
        "ovh_usage_storage_bandwidth_external_outgoing_price",
        "Storage usage external outgoing bandwidth price",
        STORAGE_USAGE_LABELS,
        StorageUsage,
    ),
    family(
        "ovh_usage_storage_bandwidth_external_outgoing_gb",
        "Storage usage external outgoing bandwidth in gb",
        STORAGE_USAGE_LABELS,
        StorageUsage,
    ),
    family(
        "ovh_usage_storage_bandwidth_external_incoming_price",
        "Storage usage external incoming bandwidth price",
        STORAGE_USAGE_LABELS,
        StorageUsage,
    ),
    family(
        "ovh_usage_storage_bandwidth_external_incoming_gb",
        "Storage usage external incoming bandwidth in gb",
        STORAGE_USAGE_LABELS,
        StorageUsage,
    ),
];

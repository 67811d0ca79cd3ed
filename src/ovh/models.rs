//! Typed payloads of the per-project OVH endpoints.
//!
//! Every substructure the API may omit is an `Option`, so an absent quota
//! category or usage section stays distinguishable from one reporting zero.
//! Numeric leaves default to `0` when absent or `null`.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// `GET /cloud/project/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub project_id: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub plan_code: Option<String>,
}

/// `GET /cloud/project/{id}/instance`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    #[serde(default, deserialize_with = "empty_string_if_null")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_if_null")]
    pub region: String,
    /// e.g. `s1-2.monthly.postpaid`
    pub plan_code: Option<String>,
    pub status: Option<String>,
}

/// `GET /cloud/project/{id}/volume`
#[derive(Debug, Clone, Deserialize)]
pub struct Volume {
    pub id: String,
    #[serde(default, deserialize_with = "empty_string_if_null")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_if_null")]
    pub region: String,
    #[serde(rename = "type", default, deserialize_with = "empty_string_if_null")]
    pub volume_type: String,
    /// Size in GB. Kept raw: the API has been seen returning strings and nulls.
    #[serde(default)]
    pub size: Option<Value>,
}

impl Volume {
    /// Size coerced to an integer number of GB.
    ///
    /// Integers, floats (truncated) and strings holding an integer are
    /// accepted; anything else yields `None`.
    pub fn size_gb(&self) -> Option<i64> {
        match self.size.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// `GET /cloud/project/{id}/storage?includeType=true`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageContainer {
    pub id: String,
    #[serde(default, deserialize_with = "empty_string_if_null")]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_if_null")]
    pub region: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub stored_bytes: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub stored_objects: f64,
    /// `public`, `private` or `static`
    #[serde(default)]
    pub container_type: Option<String>,
}

/// Raw counters of one quota category, keyed by API field name.
pub type QuotaSection = Map<String, Value>;

/// One region of `GET /cloud/project/{id}/quota`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaEntry {
    pub region: String,
    pub instance: Option<QuotaSection>,
    pub volume: Option<QuotaSection>,
    pub network: Option<QuotaSection>,
    #[serde(alias = "loadbalancer")]
    pub load_balancer: Option<QuotaSection>,
    pub keymanager: Option<QuotaSection>,
}

/// `GET /cloud/project/{id}/usage/current`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUsage {
    pub hourly_usage: Option<HourlyUsage>,
    pub monthly_usage: Option<MonthlyUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyUsage {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub instance: Vec<InstanceUsageGroup>,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub volume: Vec<VolumeUsageGroup>,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub storage: Vec<StorageUsage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthlyUsage {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub instance: Vec<InstanceUsageGroup>,
}

/// Instances of one flavor in one region.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceUsageGroup {
    /// Flavor name, e.g. `d2-2`
    pub reference: String,
    pub region: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub details: Vec<InstanceUsageDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceUsageDetail {
    pub instance_id: String,
    #[serde(default)]
    pub quantity: Option<Quantity>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_price: f64,
}

/// Volumes of one type in one region.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeUsageGroup {
    #[serde(rename = "type")]
    pub volume_type: String,
    pub region: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub details: Vec<VolumeUsageDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeUsageDetail {
    pub volume_id: String,
    #[serde(default)]
    pub quantity: Option<Quantity>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_price: f64,
}

/// Object storage usage of one bucket (or of all `pcs` containers).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    /// `pcs`, `storage-standard`, ...
    #[serde(rename = "type")]
    pub storage_type: String,
    pub region: String,
    pub bucket_name: Option<String>,
    pub total_price: Option<f64>,
    pub stored: Option<Charge>,
    pub incoming_bandwidth: Option<Charge>,
    pub outgoing_bandwidth: Option<Charge>,
    pub incoming_internal_bandwidth: Option<Charge>,
    pub outgoing_internal_bandwidth: Option<Charge>,
}

/// A billed quantity and its price.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    #[serde(default)]
    pub quantity: Option<Quantity>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_price: f64,
}

impl Charge {
    pub fn amount(&self) -> f64 {
        self.quantity.as_ref().map_or(0.0, |q| q.value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Quantity {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn empty_string_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn empty_if_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// Per-project snapshot assembly
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use super::models::{
    CurrentUsage, Instance, ProjectInfo, QuotaEntry, StorageContainer, Volume,
};
use super::AccountClient;
use crate::error::{ExporterError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

/// The six API paths read for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub project: String,
    pub instances: String,
    pub volumes: String,
    pub storages: String,
    pub quotas: String,
    pub usage: String,
}

impl ProjectPaths {
    pub fn new(service_id: &str) -> Self {
        let base = format!("/cloud/project/{}", service_id);
        Self {
            instances: format!("{}/instance", base),
            volumes: format!("{}/volume", base),
            storages: format!("{}/storage?includeType=true", base),
            quotas: format!("{}/quota", base),
            usage: format!("{}/usage/current", base),
            project: base,
        }
    }

    /// Paths without query string, as granted in consumer key access rules.
    pub fn access_rules(&self) -> Vec<&str> {
        [
            &self.project,
            &self.quotas,
            &self.instances,
            &self.storages,
            &self.usage,
            &self.volumes,
        ]
        .into_iter()
        .map(|p| p.split('?').next().unwrap_or(p.as_str()))
        .collect()
    }
}

/// One project's payloads, fetched fresh for a single scrape.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub project: ProjectInfo,
    pub instances: Vec<Instance>,
    pub volumes: Vec<Volume>,
    pub storages: Vec<StorageContainer>,
    pub quotas: Vec<QuotaEntry>,
    pub usage: CurrentUsage,
}

/// Fetch the six payloads of one project.
///
/// Calls are independent reads and run concurrently; the first failure
/// aborts the whole snapshot.
pub async fn fetch_snapshot(client: &dyn AccountClient, service_id: &str) -> Result<Snapshot> {
    let paths = ProjectPaths::new(service_id);

    let (project, instances, volumes, storages, quotas, usage) = tokio::try_join!(
        get_typed::<ProjectInfo>(client, &paths.project),
        get_records::<Instance>(client, service_id, &paths.instances),
        get_records::<Volume>(client, service_id, &paths.volumes),
        get_records::<StorageContainer>(client, service_id, &paths.storages),
        get_records::<QuotaEntry>(client, service_id, &paths.quotas),
        get_typed::<CurrentUsage>(client, &paths.usage),
    )?;

    log_instances(service_id, &instances);

    Ok(Snapshot {
        project,
        instances,
        volumes,
        storages,
        quotas,
        usage,
    })
}

async fn get_typed<T: DeserializeOwned>(client: &dyn AccountClient, path: &str) -> Result<T> {
    let value = client.get(path).await?;
    serde_json::from_value(value).map_err(|source| ExporterError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Decode a list payload record by record.
///
/// A record that does not decode is skipped with a warning naming it; its
/// siblings are kept. A payload that is not a list fails the call.
async fn get_records<T: DeserializeOwned>(
    client: &dyn AccountClient,
    service_id: &str,
    path: &str,
) -> Result<Vec<T>> {
    let records = get_typed::<Vec<Value>>(client, path).await?;
    Ok(decode_records(service_id, path, records))
}

pub(crate) fn decode_records<T: DeserializeOwned>(
    service_id: &str,
    path: &str,
    records: Vec<Value>,
) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record_id(&record);
            match serde_json::from_value(record) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!(service_id, path, "Record {} ignored as malformed: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

fn record_id(record: &Value) -> String {
    ["id", "region"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .unwrap_or("<unknown>")
        .to_string()
}

/// Flavor and billing mode of an instance plan code (`s1-2.monthly.postpaid`).
pub(crate) fn split_plan_code(plan_code: &str) -> (&str, &str) {
    let mut parts = plan_code.split('.');
    let flavor = parts.next().unwrap_or_default();
    let billing = parts.next().unwrap_or_default();
    (flavor, billing)
}

fn log_instances(service_id: &str, instances: &[Instance]) {
    for instance in instances {
        let (flavor, billing) = split_plan_code(instance.plan_code.as_deref().unwrap_or_default());
        if !matches!(billing, "monthly" | "hourly" | "consumption") {
            warn!(
                service_id,
                instance_id = %instance.id,
                "Unexpected billing '{}' for plan code {:?}",
                billing,
                instance.plan_code
            );
        }
        info!(
            service_id,
            instance_id = %instance.id,
            name = %instance.name,
            flavor,
            billing,
            region = %instance.region,
            "instance"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_paths() {
        let paths = ProjectPaths::new("abc");
        assert_eq!(paths.project, "/cloud/project/abc");
        assert_eq!(paths.storages, "/cloud/project/abc/storage?includeType=true");
        assert_eq!(paths.usage, "/cloud/project/abc/usage/current");
        assert!(paths.access_rules().contains(&"/cloud/project/abc/storage"));
        assert_eq!(paths.access_rules().len(), 6);
    }

    #[test]
    fn test_malformed_record_keeps_siblings() {
        let records = vec![
            json!({"id": "v1", "name": "data", "region": "GRA7", "type": "classic", "size": 10}),
            json!({"id": "v2", "name": ["not", "a", "name"]}),
            json!({"name": "no-id"}),
        ];
        let volumes: Vec<Volume> = decode_records("p1", "/cloud/project/p1/volume", records);
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].id, "v1");
    }

    #[test]
    fn test_record_id() {
        assert_eq!(record_id(&json!({"id": "v1"})), "v1");
        assert_eq!(record_id(&json!({"region": "GRA7"})), "GRA7");
        assert_eq!(record_id(&json!(42)), "<unknown>");
    }

    #[test]
    fn test_split_plan_code() {
        assert_eq!(split_plan_code("s1-2.monthly.postpaid"), ("s1-2", "monthly"));
        assert_eq!(split_plan_code("d2-4.consumption"), ("d2-4", "consumption"));
        assert_eq!(split_plan_code("weird"), ("weird", ""));
    }
}

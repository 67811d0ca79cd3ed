// Per-scrape gauge families
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use super::catalogue::{Category, FamilySpec, CATALOGUE, SERVICE_ID_LABEL};
use prometheus::proto::{Gauge, LabelPair, Metric, MetricFamily, MetricType};
use std::collections::HashMap;

/// One labeled value of a gauge family.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub labels: Vec<String>,
    pub value: f64,
}

/// A gauge metric family and the observations gathered during one scrape.
#[derive(Debug, Clone)]
pub struct GaugeFamily {
    spec: &'static FamilySpec,
    label_names: Vec<String>,
    observations: Vec<Observation>,
}

impl GaugeFamily {
    fn new(spec: &'static FamilySpec, project_label_names: &[String]) -> Self {
        let label_names = project_label_names
            .iter()
            .cloned()
            .chain(std::iter::once(SERVICE_ID_LABEL.to_string()))
            .chain(spec.labels.iter().map(|l| l.to_string()))
            .collect();

        Self {
            spec,
            label_names,
            observations: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn help(&self) -> &'static str {
        self.spec.help
    }

    pub fn category(&self) -> Category {
        self.spec.category
    }

    /// Full label schema: project labels, `service_id`, then category labels.
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Value of the observation whose labels match exactly.
    pub fn get(&self, labels: &[&str]) -> Option<f64> {
        self.observations
            .iter()
            .find(|o| o.labels.iter().map(String::as_str).eq(labels.iter().copied()))
            .map(|o| o.value)
    }

    fn push(&mut self, labels: Vec<String>, value: f64) {
        assert_eq!(
            labels.len(),
            self.label_names.len(),
            "label values {:?} do not match schema {:?} of {}",
            labels,
            self.label_names,
            self.spec.name
        );
        self.observations.push(Observation { labels, value });
    }

    /// Convert to the protobuf family consumed by `prometheus::TextEncoder`.
    pub fn to_proto(&self) -> MetricFamily {
        let mut family = MetricFamily::default();
        family.set_name(self.spec.name.to_string());
        family.set_help(self.spec.help.to_string());
        family.set_field_type(MetricType::GAUGE);

        for observation in &self.observations {
            let mut metric = Metric::default();
            for (name, value) in self.label_names.iter().zip(&observation.labels) {
                let mut pair = LabelPair::default();
                pair.set_name(name.clone());
                pair.set_value(value.clone());
                metric.mut_label().push(pair);
            }
            let mut gauge = Gauge::default();
            gauge.set_value(observation.value);
            metric.set_gauge(gauge);
            family.mut_metric().push(metric);
        }

        family
    }
}

/// The full set of gauge families for one scrape.
///
/// Built fresh by every `collect()` and dropped once exposed, so no
/// observation outlives the scrape that produced it.
#[derive(Debug)]
pub struct Metrics {
    families: Vec<GaugeFamily>,
    index: HashMap<&'static str, usize>,
}

impl Metrics {
    pub fn new(project_label_names: &[String]) -> Self {
        let families: Vec<GaugeFamily> = CATALOGUE
            .iter()
            .map(|spec| GaugeFamily::new(spec, project_label_names))
            .collect();
        let index = families
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name(), i))
            .collect();

        Self { families, index }
    }

    /// Append an observation to the family `name`.
    ///
    /// # Panics
    ///
    /// When `name` is not in the catalogue or `labels` does not match the
    /// family's label schema; both are programming errors.
    pub fn add(&mut self, name: &str, labels: Vec<String>, value: f64) {
        let Some(&i) = self.index.get(name) else {
            panic!("unknown gauge family {}", name);
        };
        self.families[i].push(labels, value);
    }

    pub fn family(&self, name: &str) -> Option<&GaugeFamily> {
        self.index.get(name).map(|&i| &self.families[i])
    }

    pub fn families(&self) -> &[GaugeFamily] {
        &self.families
    }

    pub fn into_families(self) -> Vec<GaugeFamily> {
        self.families
    }
}

/// Protobuf families ready for text encoding.
///
/// Families without observations are left out: the text encoder rejects them.
pub fn encodable(families: &[GaugeFamily]) -> Vec<MetricFamily> {
    families
        .iter()
        .filter(|f| !f.is_empty())
        .map(GaugeFamily::to_proto)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_empty() {
        let metrics = Metrics::new(&[]);
        assert_eq!(metrics.families().len(), CATALOGUE.len());
        assert!(metrics.families().iter().all(GaugeFamily::is_empty));
    }

    #[test]
    fn test_label_schema_order() {
        let metrics = Metrics::new(&["env".to_string(), "team".to_string()]);
        let family = metrics.family("ovh_volume_size_gb").unwrap();
        assert_eq!(
            family.label_names(),
            &["env", "team", "service_id", "volume_id", "name", "region", "type"]
        );
    }

    #[test]
    #[should_panic(expected = "do not match schema")]
    fn test_label_arity_is_enforced() {
        let mut metrics = Metrics::new(&[]);
        metrics.add("ovh_quota_cpu_count", vec!["only-one".to_string()], 1.0);
    }

    #[test]
    #[should_panic(expected = "unknown gauge family")]
    fn test_unknown_family_panics() {
        let mut metrics = Metrics::new(&[]);
        metrics.add("ovh_nope", vec![], 1.0);
    }

    #[test]
    fn test_to_proto() {
        let mut metrics = Metrics::new(&["env".to_string()]);
        metrics.add(
            "ovh_quota_cpu_count",
            vec!["prod".to_string(), "abc".to_string(), "GRA7".to_string()],
            4.0,
        );

        let proto = metrics.family("ovh_quota_cpu_count").unwrap().to_proto();
        assert_eq!(proto.get_name(), "ovh_quota_cpu_count");
        assert_eq!(proto.get_field_type(), MetricType::GAUGE);
        let metric = &proto.get_metric()[0];
        assert_eq!(metric.get_gauge().get_value(), 4.0);
        let labels: Vec<_> = metric
            .get_label()
            .iter()
            .map(|l| (l.get_name(), l.get_value()))
            .collect();
        assert_eq!(labels, vec![("env", "prod"), ("service_id", "abc"), ("region", "GRA7")]);

        assert_eq!(encodable(metrics.families()).len(), 1);
    }
}

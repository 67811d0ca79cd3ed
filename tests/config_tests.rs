// Configuration loading tests
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use ovh_exporter::config::AppConfig;
use ovh_exporter::error::ExporterError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config() {
    std::env::set_var("OVH_EXPORTER_TEST_CK", "expanded-consumer-key");
    let file = write_config(
        r#"
ovh:
  endpoint: ovh-ca
  application_key: ak
  application_secret: as
  consumer_key: ${OVH_EXPORTER_TEST_CK}
server:
  host: 0.0.0.0
  port: 9200
  basic_auth:
    enabled: true
    login: prometheus
    password: scrape
logging:
  level: debug
  format: json
services:
  - id: 0123456789abcdef0123456789abcdef
    labels:
      env: prod
      team: core
  - id: fedcba9876543210fedcba9876543210
    labels:
      env: dev
      team: core
"#,
    );

    let config = AppConfig::load(file.path()).unwrap();

    assert_eq!(config.ovh.endpoint, "ovh-ca");
    assert_eq!(config.ovh.consumer_key.as_deref(), Some("expanded-consumer-key"));
    assert_eq!(config.ovh.timeout_seconds, 30);
    assert_eq!(config.server.port, 9200);
    assert!(config.server.basic_auth.enabled);
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.services.len(), 2);
    assert_eq!(
        config.services[0].labels.keys().collect::<Vec<_>>(),
        vec!["env", "team"]
    );
}

#[test]
fn test_defaults_apply() {
    let file = write_config(
        r#"
ovh:
  application_key: ak
  application_secret: as
services:
  - id: 0123456789abcdef0123456789abcdef
"#,
    );

    let config = AppConfig::load(file.path()).unwrap();

    assert_eq!(config.ovh.endpoint, "ovh-eu");
    assert_eq!(config.ovh.consumer_key, None);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9100);
    assert!(!config.server.basic_auth.enabled);
    assert_eq!(config.logging.level, "info");
    assert!(config.services[0].labels.is_empty());
}

#[test]
fn test_missing_file_is_error() {
    let result = AppConfig::load("/nonexistent/ovh-exporter.yaml");
    assert!(matches!(result, Err(ExporterError::ConfigParsing(_))));
}

#[test]
fn test_undefined_variable_is_error() {
    let file = write_config(
        r#"
ovh:
  application_key: ak
  application_secret: ${OVH_EXPORTER_TEST_SURELY_UNDEFINED}
"#,
    );

    let result = AppConfig::load(file.path());
    assert!(matches!(result, Err(ExporterError::Config(_))));
}

#[test]
fn test_invalid_service_id_is_error() {
    let file = write_config(
        r#"
services:
  - id: not-a-project
"#,
    );

    let result = AppConfig::load(file.path());
    assert!(matches!(result, Err(ExporterError::Config(_))));
}

#[test]
fn test_label_names_must_match() {
    let file = write_config(
        r#"
services:
  - id: 0123456789abcdef0123456789abcdef
    labels:
      env: prod
  - id: fedcba9876543210fedcba9876543210
    labels:
      stage: prod
"#,
    );

    match AppConfig::load(file.path()) {
        Err(ExporterError::Config(message)) => {
            assert!(message.contains("must be the same for all services"))
        }
        other => panic!("unexpected result {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_env_file_feeds_expansion() {
    let mut env_file = tempfile::Builder::new().suffix(".env").tempfile().unwrap();
    writeln!(env_file, "OVH_EXPORTER_TEST_FROM_ENV_FILE=ck-from-file").unwrap();

    let file = write_config(&format!(
        r#"
env_file: {}
ovh:
  application_key: ak
  application_secret: as
  consumer_key: ${{OVH_EXPORTER_TEST_FROM_ENV_FILE}}
"#,
        env_file.path().display()
    ));

    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.ovh.consumer_key.as_deref(), Some("ck-from-file"));
}

#[test]
fn test_tls_section() {
    let file = write_config(
        r#"
server:
  tls:
    enabled: true
    cert_file: /etc/ovh-exporter/cert.pem
    key_file: /etc/ovh-exporter/key.pem
"#,
    );

    let config = AppConfig::load(file.path()).unwrap();
    assert!(config.server.tls.enabled);
    assert_eq!(
        config.server.tls.key_file.as_deref(),
        Some(std::path::Path::new("/etc/ovh-exporter/key.pem"))
    );
}

#[test]
fn test_tls_requires_both_files() {
    let file = write_config(
        r#"
server:
  tls:
    enabled: true
    cert_file: /etc/ovh-exporter/cert.pem
"#,
    );

    assert!(matches!(AppConfig::load(file.path()), Err(ExporterError::Config(_))));
}

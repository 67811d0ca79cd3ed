// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

mod models;

pub use models::*;

use crate::collector::ENGINE_LABEL_NAMES;
use crate::error::{ExporterError, Result};
use config::{Config, Environment, File};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

lazy_static! {
    static ref SERVICE_ID: Regex = Regex::new(r"^[a-f0-9]{32}$").unwrap();
    static ref LABEL_NAME: Regex = Regex::new(r"^[a-zA-Z0-9_:]+$").unwrap();
    static ref ENV_REFERENCE: Regex =
        Regex::new(r"\$(?:\$|\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))").unwrap();
}

const ENDPOINTS: &[&str] = &[
    "ovh-eu",
    "ovh-us",
    "ovh-ca",
    "soyoustart-eu",
    "soyoustart-ca",
    "kimsufi-eu",
    "kimsufi-ca",
];

impl AppConfig {
    /// Load configuration with precedence:
    /// 1. Environment variables (`OVH_EXPORTER__SECTION__KEY`)
    /// 2. YAML config file
    /// 3. Defaults (lowest)
    ///
    /// `${VAR}` references are then expanded and the result validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path.as_ref()).required(true))
            .add_source(Environment::with_prefix("OVH_EXPORTER").separator("__"))
            .build()?;

        let mut app: AppConfig = config.try_deserialize()?;
        app.load_env_file()?;
        app.expand_env()?;
        app.validate()?;
        Ok(app)
    }

    /// Load `env_file` into the process environment, if configured.
    ///
    /// A missing file is only logged so the same configuration runs where
    /// variables come from the environment itself.
    pub fn load_env_file(&self) -> Result<()> {
        let Some(path) = self.env_file.as_deref() else {
            return Ok(());
        };
        if !path.exists() {
            debug!("Environment file {} not found, skipped", path.display());
            return Ok(());
        }

        dotenvy::from_path(path).map_err(|e| {
            ExporterError::Config(format!(
                "Failed to load environment file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded environment file {}", path.display());
        Ok(())
    }

    /// Expand `${VAR}` / `$VAR` references in credentials, basic auth and
    /// label values. An undefined variable is an error; `$$` is a literal `$`.
    pub fn expand_env(&mut self) -> Result<()> {
        self.ovh.endpoint = expand_vars(&self.ovh.endpoint)?;
        self.ovh.application_key = expand_vars(&self.ovh.application_key)?;
        self.ovh.application_secret = expand_vars(&self.ovh.application_secret)?;
        if let Some(key) = self.ovh.consumer_key.as_deref() {
            self.ovh.consumer_key = Some(expand_vars(key)?);
        }

        let auth = &mut self.server.basic_auth;
        if let Some(login) = auth.login.as_deref() {
            auth.login = Some(expand_vars(login)?);
        }
        if let Some(password) = auth.password.as_deref() {
            auth.password = Some(expand_vars(password)?);
        }

        for service in &mut self.services {
            for value in service.labels.values_mut() {
                *value = expand_vars(value)?;
            }
        }
        Ok(())
    }

    /// Check everything that must hold before the exporter may start.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.ovh.endpoint.as_str();
        if !ENDPOINTS.contains(&endpoint)
            && !endpoint.starts_with("https://")
            && !endpoint.starts_with("http://")
        {
            return Err(ExporterError::Config(format!(
                "Unknown OVH endpoint '{}' (expected one of {})",
                endpoint,
                ENDPOINTS.join(", ")
            )));
        }

        let auth = &self.server.basic_auth;
        if auth.enabled && (auth.login.is_none() || auth.password.is_none()) {
            return Err(ExporterError::Config(
                "server.basic_auth requires both login and password".to_string(),
            ));
        }

        let tls = &self.server.tls;
        if tls.enabled && (tls.cert_file.is_none() || tls.key_file.is_none()) {
            return Err(ExporterError::Config(
                "server.tls requires both cert_file and key_file".to_string(),
            ));
        }

        let mut expected: Option<BTreeSet<&str>> = None;
        for service in &self.services {
            if !SERVICE_ID.is_match(&service.id) {
                return Err(ExporterError::Config(format!(
                    "Invalid service id '{}' (expected 32 lowercase hex characters)",
                    service.id
                )));
            }

            for name in service.labels.keys() {
                if !LABEL_NAME.is_match(name) {
                    return Err(ExporterError::Config(format!(
                        "Invalid label name '{}' on service {}",
                        name, service.id
                    )));
                }
                if ENGINE_LABEL_NAMES.contains(&name.as_str()) {
                    return Err(ExporterError::Config(format!(
                        "Label name '{}' on service {} is reserved by the exporter",
                        name, service.id
                    )));
                }
            }

            let names: BTreeSet<&str> = service.labels.keys().map(String::as_str).collect();
            match &expected {
                None => expected = Some(names),
                Some(first) if *first != names => {
                    return Err(ExporterError::Config(
                        "Service label names must be the same for all services".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

fn expand_vars(input: &str) -> Result<String> {
    let mut missing = None;
    let expanded = ENV_REFERENCE.replace_all(input, |caps: &Captures| {
        let Some(name) = caps.get(1).or_else(|| caps.get(2)) else {
            return "$".to_string();
        };
        match std::env::var(name.as_str()) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| name.as_str().to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(ExporterError::Config(format!(
            "Environment variable '{}' referenced in configuration is not set",
            name
        ))),
        None => Ok(expanded.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn service(id: &str, labels: &[(&str, &str)]) -> ServiceConfig {
        ServiceConfig {
            id: id.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    const ID_A: &str = "0123456789abcdef0123456789abcdef";
    const ID_B: &str = "fedcba9876543210fedcba9876543210";

    #[test]
    fn test_expand_vars() {
        std::env::set_var("OVH_EXPORTER_TEST_CK", "secret-ck");
        assert_eq!(expand_vars("${OVH_EXPORTER_TEST_CK}").unwrap(), "secret-ck");
        assert_eq!(expand_vars("x-$OVH_EXPORTER_TEST_CK").unwrap(), "x-secret-ck");
        assert_eq!(expand_vars("cost $$5").unwrap(), "cost $5");
        assert_eq!(expand_vars("plain").unwrap(), "plain");
    }

    #[test]
    fn test_expand_vars_missing_is_error() {
        let err = expand_vars("${OVH_EXPORTER_TEST_SURELY_UNSET}").unwrap_err();
        assert!(err.to_string().contains("OVH_EXPORTER_TEST_SURELY_UNSET"));
    }

    #[test]
    fn test_validate_label_name_sets() {
        let mut config = AppConfig::default();
        config.services = vec![
            service(ID_A, &[("env", "prod"), ("team", "a")]),
            service(ID_B, &[("team", "b"), ("env", "dev")]),
        ];
        assert!(config.validate().is_ok());

        config.services[1].labels.remove("team");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be the same"));
    }

    #[test]
    fn test_validate_service_id() {
        let mut config = AppConfig::default();
        config.services = vec![service("not-a-project", &[])];
        assert!(matches!(config.validate(), Err(ExporterError::Config(_))));
    }

    #[test]
    fn test_validate_reserved_label() {
        let mut config = AppConfig::default();
        config.services = vec![service(ID_A, &[("region", "x")])];
        assert!(config.validate().unwrap_err().to_string().contains("reserved"));
    }

    #[test]
    fn test_validate_endpoint() {
        let mut config = AppConfig::default();
        config.ovh.endpoint = "ovh-mars".to_string();
        assert!(config.validate().is_err());
        config.ovh.endpoint = "http://127.0.0.1:1234".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_tls() {
        let mut config = AppConfig::default();
        config.server.tls.enabled = true;
        config.server.tls.cert_file = Some("cert.pem".into());
        assert!(config.validate().unwrap_err().to_string().contains("key_file"));
        config.server.tls.key_file = Some("key.pem".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_env_file_is_skipped() {
        let mut config = AppConfig::default();
        config.env_file = Some("/nonexistent/ovh-exporter.env".into());
        assert!(config.load_env_file().is_ok());
    }

    #[test]
    fn test_validate_basic_auth() {
        let mut config = AppConfig::default();
        config.server.basic_auth.enabled = true;
        config.server.basic_auth.login = Some("prom".to_string());
        assert!(config.validate().is_err());
        config.server.basic_auth.password = Some("pw".to_string());
        assert!(config.validate().is_ok());
    }
}

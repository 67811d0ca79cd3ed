//! Configuration data structures for the OVH exporter.
//!
//! This module defines the schema of `config.yaml`: the OVH account
//! credentials, the HTTP server settings, logging, and the list of cloud
//! projects (services) to scrape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use zeroize::Zeroize;

/// The root configuration object for the exporter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// OVH API account and credentials.
    #[serde(default)]
    pub ovh: OvhAccountConfig,

    /// HTTP server settings (host, port, basic auth).
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cloud projects to scrape.
    #[serde(default)]
    pub services: Vec<ServiceConfig>,

    /// Dotenv file loaded before `${VAR}` references are expanded.
    /// Variables already set in the environment win.
    #[serde(default)]
    pub env_file: Option<PathBuf>,
}

/// OVH API account settings.
#[derive(Clone, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct OvhAccountConfig {
    /// API endpoint alias (`ovh-eu`, `ovh-ca`, ...) or an absolute base URL.
    /// Default: `ovh-eu`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub application_key: String,

    #[serde(default)]
    pub application_secret: String,

    /// Consumer key obtained through `ovh-exporter login`.
    /// `${ENV_VAR}` references are expanded at load time.
    #[serde(default)]
    pub consumer_key: Option<String>,

    /// Per-request timeout in seconds.
    /// Default: `30`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

// Never print secrets
impl fmt::Debug for OvhAccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OvhAccountConfig")
            .field("endpoint", &self.endpoint)
            .field("application_key", &self.application_key)
            .field("application_secret", &"[REDACTED]")
            .field("consumer_key", &self.consumer_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `9100`
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub basic_auth: BasicAuthConfig,

    #[serde(default)]
    pub tls: TlsConfig,
}

/// HTTPS serving with a PEM certificate chain and private key.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TlsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub cert_file: Option<PathBuf>,

    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

/// HTTP basic authentication guarding every route.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct BasicAuthConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub login: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for BasicAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthConfig")
            .field("enabled", &self.enabled)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// One OVH public cloud project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Project identifier (32 lowercase hex characters).
    pub id: String,

    /// Static Prometheus labels added to every metric of this project.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Default for OvhAccountConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            application_key: String::new(),
            application_secret: String::new(),
            consumer_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            basic_auth: BasicAuthConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_endpoint() -> String {
    "ovh-eu".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

// CLI module for ovh-exporter
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use crate::config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects
#[derive(Parser, Debug)]
#[command(name = "ovh-exporter", version, about, long_about = None)]
pub struct Args {
    /// Configuration file (YAML)
    #[arg(short, long, env = "OVH_EXPORTER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log level, overrides `logging.level`
    #[arg(
        short,
        long,
        value_parser = ["error", "warning", "warn", "info", "debug", "trace"]
    )]
    pub verbosity: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the exporter (default)
    Server {
        /// PEM certificate chain, enables HTTPS together with --tls-key-file
        #[arg(long, requires = "tls_key_file")]
        tls_cert_file: Option<PathBuf>,

        /// PEM private key, enables HTTPS together with --tls-cert-file
        #[arg(long, requires = "tls_cert_file")]
        tls_key_file: Option<PathBuf>,
    },
    /// Fetch the first configured project once and print a summary
    Check,
    /// Print the metric catalogue, without calling the API
    Describe,
    /// Request a consumer key granting read access to the configured projects
    Login,
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Server {
            tls_cert_file: None,
            tls_key_file: None,
        })
    }

    /// Verbosity as an `EnvFilter` directive.
    pub fn log_level(&self) -> Option<&str> {
        self.verbosity.as_deref().map(|level| match level {
            "warning" => "warn",
            other => other,
        })
    }
}

// HTTPS serving
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use crate::config::TlsConfig;
use crate::error::{ExporterError, Result};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

/// Load the PEM certificate chain and private key named in `config`.
pub async fn rustls_config(config: &TlsConfig) -> Result<RustlsConfig> {
    let (Some(cert_file), Some(key_file)) = (&config.cert_file, &config.key_file) else {
        return Err(ExporterError::Config(
            "server.tls requires both cert_file and key_file".to_string(),
        ));
    };

    let _ = rustls::crypto::ring::default_provider().install_default();

    RustlsConfig::from_pem_file(cert_file, key_file)
        .await
        .map_err(|e| {
            ExporterError::Config(format!(
                "Failed to load TLS certificate {} / key {}: {}",
                cert_file.display(),
                key_file.display(),
                e
            ))
        })
}

/// Serve `app` over HTTPS until `shutdown` resolves.
pub async fn serve_tls<F>(
    addr: SocketAddr,
    app: Router,
    tls: RustlsConfig,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
    });

    info!("Starting HTTPS server on {}", addr);
    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_files_are_config_errors() {
        let config = TlsConfig {
            enabled: true,
            cert_file: Some("/nonexistent/cert.pem".into()),
            key_file: Some("/nonexistent/key.pem".into()),
        };
        let err = rustls_config(&config).await.unwrap_err();
        assert!(matches!(err, ExporterError::Config(_)));
        assert!(err.to_string().contains("/nonexistent/cert.pem"));
    }

    #[tokio::test]
    async fn test_incomplete_config() {
        let config = TlsConfig {
            enabled: true,
            cert_file: None,
            key_file: Some("key.pem".into()),
        };
        assert!(matches!(
            rustls_config(&config).await,
            Err(ExporterError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_pem_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        std::fs::write(&cert, "not a certificate").unwrap();
        std::fs::write(&key, "not a key").unwrap();

        let config = TlsConfig {
            enabled: true,
            cert_file: Some(cert),
            key_file: Some(key),
        };
        assert!(rustls_config(&config).await.is_err());
    }
}

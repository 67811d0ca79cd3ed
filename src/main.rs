// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use anyhow::{anyhow, Result};
use clap::Parser;
use ovh_exporter::cli::{Args, Command};
use ovh_exporter::collector::OvhCollector;
use ovh_exporter::config::AppConfig;
use ovh_exporter::ovh::{fetch_snapshot, login, OvhClient};
use ovh_exporter::server::{create_router, rustls_config, serve_tls};
use ovh_exporter::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(&args.config)?;
    if let Some(level) = args.log_level() {
        config.logging.level = level.to_string();
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting ovh-exporter v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the OVH client (no network call yet)
    let client = OvhClient::new(&config.ovh)?;
    info!("OVH API endpoint: {}", client.base_url());

    match args.command() {
        Command::Login => login::run(&client, &config.services).await,
        Command::Describe => describe(client, &config),
        Command::Check => check(&client, &config).await,
        Command::Server {
            tls_cert_file,
            tls_key_file,
        } => {
            if let (Some(cert), Some(key)) = (tls_cert_file, tls_key_file) {
                config.server.tls.enabled = true;
                config.server.tls.cert_file = Some(cert);
                config.server.tls.key_file = Some(key);
            }
            serve(client, config).await
        }
    }
}

fn describe(client: OvhClient, config: &AppConfig) -> Result<()> {
    let collector = OvhCollector::new(Arc::new(client), config.services.clone())?;
    for family in collector.describe() {
        println!("# HELP {} {}", family.name(), family.help());
        println!("# TYPE {} gauge", family.name());
        println!("# LABELS {}", family.label_names().join(","));
    }
    Ok(())
}

async fn check(client: &OvhClient, config: &AppConfig) -> Result<()> {
    let service = config
        .services
        .first()
        .ok_or_else(|| anyhow!("No service configured"))?;

    let snapshot = fetch_snapshot(client, &service.id).await?;
    println!("Project {}", service.id);
    println!(
        "  description: {}",
        snapshot.project.description.as_deref().unwrap_or("-")
    );
    println!("  instances:   {}", snapshot.instances.len());
    println!("  volumes:     {}", snapshot.volumes.len());
    println!("  storages:    {}", snapshot.storages.len());
    println!("  quotas:      {} region(s)", snapshot.quotas.len());
    Ok(())
}

async fn serve(client: OvhClient, config: AppConfig) -> Result<()> {
    // Phase 4: Build the collector (validates project labels)
    let collector = OvhCollector::new(Arc::new(client), config.services.clone())?;
    info!(
        "Exporting {} project(s) with labels {:?}",
        collector.services().len(),
        collector.label_names()
    );

    // Phase 5: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    if config.server.basic_auth.enabled {
        info!("HTTP basic authentication enabled");
    }
    let tls = if config.server.tls.enabled {
        info!("Using TLS server");
        Some(rustls_config(&config.server.tls).await?)
    } else {
        None
    };
    let app = create_router(config, collector)?;

    // Phase 6: Run server with graceful shutdown
    if let Some(tls) = tls {
        println!("Visit https://{}/metrics to view metrics.", addr);
        serve_tls(addr, app, tls, shutdown_signal()).await?;
    } else {
        info!("Starting server on {}", addr);
        println!("Visit http://{}/metrics to view metrics.", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

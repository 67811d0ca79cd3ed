// Consumer key request flow
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use super::{OvhClient, ProjectPaths};
use crate::config::ServiceConfig;
use anyhow::{anyhow, Context, Result};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use tracing::{debug, info};

/// A consumer key waiting for the account owner to validate it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCredential {
    pub validation_url: String,
    pub consumer_key: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// Read-only rules for `/me` and the six paths of every service.
pub fn access_rules(services: &[ServiceConfig]) -> Vec<Value> {
    let mut paths = vec!["/me".to_string()];
    for service in services {
        let project = ProjectPaths::new(&service.id);
        paths.extend(project.access_rules().into_iter().map(str::to_string));
    }

    paths
        .into_iter()
        .map(|path| json!({ "method": "GET", "path": path }))
        .collect()
}

/// Ask the API for a new consumer key redirecting to `redirection`.
pub async fn request_credential(
    client: &OvhClient,
    services: &[ServiceConfig],
    redirection: &str,
) -> Result<PendingCredential> {
    let body = json!({
        "accessRules": access_rules(services),
        "redirection": redirection,
    });

    let response = client
        .call_unauthenticated(Method::POST, "/auth/credential", Some(&body))
        .await
        .context("Failed to request consumer key")?;

    serde_json::from_value(response).context("Unexpected /auth/credential response")
}

/// Run the interactive login flow.
///
/// The validation page redirects to a local callback server; once it is
/// hit, the consumer key is valid and printed for the operator to store.
pub async fn run(client: &OvhClient, services: &[ServiceConfig]) -> Result<()> {
    info!("Starting consumer key request flow...");

    let listener =
        TcpListener::bind("127.0.0.1:0").context("Failed to bind local callback server")?;
    let port = listener.local_addr()?.port();
    let redirection = format!("http://localhost:{}/", port);
    debug!("Callback server listening on port {}", port);

    let pending = request_credential(client, services, &redirection).await?;

    println!("\nOpening browser for OVH authorization...");
    println!("If browser doesn't open, visit:\n{}\n", pending.validation_url);

    if let Err(e) = open::that(&pending.validation_url) {
        eprintln!("Warning: Could not open browser automatically: {}", e);
        println!("Please copy the URL above and paste it in your browser.");
    }

    println!("Waiting for authorization...");
    tokio::task::spawn_blocking(move || wait_for_callback(&listener))
        .await
        .map_err(|e| anyhow!("Callback server task failed: {}", e))??;

    println!("\n✓ Login success!");
    println!("  consumer_key: {}", pending.consumer_key);
    println!("\nStore it as ovh.consumer_key (or OVH_EXPORTER__OVH__CONSUMER_KEY).\n");

    Ok(())
}

/// Block until the browser hits the redirection URL.
fn wait_for_callback(listener: &TcpListener) -> Result<()> {
    for stream in listener.incoming() {
        let mut stream = stream.context("Failed to accept connection")?;

        let mut reader = BufReader::new(&stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line)?;

        if !request_line.starts_with("GET / ") && !request_line.starts_with("GET /?") {
            let response = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n";
            stream.write_all(response.as_bytes())?;
            continue;
        }

        let response = "HTTP/1.1 200 OK\r\nContent-Type: text/plain;charset=utf-8\r\n\r\n\
            Login success! Go back to your terminal.";
        stream.write_all(response.as_bytes())?;
        debug!("Callback received");
        return Ok(());
    }

    Err(anyhow!("Callback server stopped unexpectedly"))
}

// OVH API client with request signing
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use super::{endpoint_url, AccountClient};
use crate::config::OvhAccountConfig;
use crate::error::{ExporterError, Result};
use crate::metrics;
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;
use tracing::debug;

/// Signed client for the OVH REST API.
///
/// Requests carrying a consumer key are signed as
/// `$1$` + hex(SHA1(AS + CK + METHOD + URL + BODY + TIMESTAMP)) joined by `+`,
/// where the timestamp is corrected by the server clock delta fetched once
/// from `/auth/time`.
pub struct OvhClient {
    http_client: Client,
    base_url: String,
    application_key: String,
    application_secret: String,
    consumer_key: Option<String>,
    time_delta: OnceCell<i64>,
}

impl OvhClient {
    pub fn new(config: &OvhAccountConfig) -> Result<Self> {
        let base_url = endpoint_url(&config.endpoint).ok_or_else(|| {
            ExporterError::Config(format!("Unknown OVH endpoint '{}'", config.endpoint))
        })?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .use_rustls_tls()
            .build()
            .map_err(|e| ExporterError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created OVH API client for {}", base_url);

        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
            application_key: config.application_key.clone(),
            application_secret: config.application_secret.clone(),
            consumer_key: config.consumer_key.clone().filter(|ck| !ck.is_empty()),
            time_delta: OnceCell::new(),
        })
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request that carries only the application key.
    ///
    /// Used by the consumer key request flow, before any consumer key exists.
    pub async fn call_unauthenticated(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        self.call(method, path, body, false).await
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        need_auth: bool,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let body = match body {
            Some(value) => serde_json::to_string(value)?,
            None => String::new(),
        };

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .header("X-Ovh-Application", &self.application_key)
            .header("Accept", "application/json");

        if !body.is_empty() {
            request = request
                .header("Content-Type", "application/json")
                .body(body.clone());
        }

        if need_auth {
            let consumer_key = self.consumer_key.as_deref().ok_or_else(|| {
                ExporterError::Config(
                    "ovh.consumer_key is not set, run `ovh-exporter login` first".to_string(),
                )
            })?;
            let timestamp = (unix_now() + self.time_delta().await?).to_string();
            let signature = sign(
                &self.application_secret,
                consumer_key,
                method.as_str(),
                &url,
                &body,
                &timestamp,
            );
            request = request
                .header("X-Ovh-Consumer", consumer_key)
                .header("X-Ovh-Timestamp", timestamp)
                .header("X-Ovh-Signature", signature);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        metrics::record_api_request(path, status.as_u16());

        if !status.is_success() {
            return Err(ExporterError::api(path, status.as_u16(), &text));
        }

        debug!("{} {}: {}", method, path, sanitize(&text));

        serde_json::from_str(&text).map_err(|source| ExporterError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Server clock minus local clock, fetched on first use.
    async fn time_delta(&self) -> Result<i64> {
        self.time_delta
            .get_or_try_init(|| async {
                let response = self
                    .http_client
                    .get(format!("{}/auth/time", self.base_url))
                    .header("X-Ovh-Application", &self.application_key)
                    .send()
                    .await?;
                let status = response.status();
                let text = response.text().await?;
                metrics::record_api_request("/auth/time", status.as_u16());
                if !status.is_success() {
                    return Err(ExporterError::api("/auth/time", status.as_u16(), &text));
                }

                let server_time: i64 = text.trim().parse().map_err(|_| {
                    ExporterError::Internal(format!("/auth/time returned '{}'", text.trim()))
                })?;
                let delta = server_time - unix_now();
                debug!("OVH API clock delta: {}s", delta);
                Ok::<i64, ExporterError>(delta)
            })
            .await
            .copied()
    }
}

#[async_trait]
impl AccountClient for OvhClient {
    async fn get(&self, path: &str) -> Result<Value> {
        self.call(Method::GET, path, None, true).await
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Compute the `X-Ovh-Signature` header value.
pub(crate) fn sign(
    application_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: &str,
) -> String {
    let payload = [application_secret, consumer_key, method, url, body, timestamp].join("+");
    let digest = ring::digest::digest(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY, payload.as_bytes());
    format!("$1${}", hex::encode(digest.as_ref()))
}

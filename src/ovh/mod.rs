//! OVH API access.
//!
//! - `client`: signed HTTP client implementing [`AccountClient`].
//! - `models`: typed payloads of the six per-project endpoints.
//! - `fetch`: assembles one [`Snapshot`] per project and scrape.
//! - `login`: consumer key request flow.

mod client;
mod fetch;
pub mod login;
pub mod models;

pub use client::OvhClient;
pub use fetch::{fetch_snapshot, ProjectPaths, Snapshot};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Read-only access to the OVH API with already valid credentials.
///
/// Any non-success response is an error; the engine does not look at
/// status codes beyond that.
#[async_trait]
pub trait AccountClient: Send + Sync {
    /// `GET` an API path (relative to the endpoint base, query string included).
    async fn get(&self, path: &str) -> Result<Value>;
}

/// Resolve an endpoint alias to its API base URL.
///
/// Absolute URLs are passed through, which is how tests and proxies point
/// the client elsewhere.
pub fn endpoint_url(endpoint: &str) -> Option<&str> {
    let url = match endpoint {
        "ovh-eu" => "https://eu.api.ovh.com/1.0",
        "ovh-us" => "https://api.us.ovhcloud.com/1.0",
        "ovh-ca" => "https://ca.api.ovh.com/1.0",
        "soyoustart-eu" => "https://eu.api.soyoustart.com/1.0",
        "soyoustart-ca" => "https://ca.api.soyoustart.com/1.0",
        "kimsufi-eu" => "https://eu.api.kimsufi.com/1.0",
        "kimsufi-ca" => "https://ca.api.kimsufi.com/1.0",
        other if other.starts_with("https://") || other.starts_with("http://") => {
            other.trim_end_matches('/')
        }
        _ => return None,
    };
    Some(url)
}

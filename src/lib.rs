// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod metrics;
pub mod ovh;
pub mod server;
pub mod utils;

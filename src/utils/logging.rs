//! Structured logging and secret redaction.
//!
//! Configures the `tracing` subscriber and keeps OVH credentials (consumer
//! keys, application secrets, request signatures) out of log lines.

use crate::config::LoggingConfig;
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    static ref SIGNATURE: Regex = Regex::new(r"\$1\$[0-9a-fA-F]{40}").unwrap();
    static ref SECRET_FIELD: Regex = Regex::new(
        r#"(?i)("?(?:consumer_?key|application_?secret|x-ovh-consumer)"?\s*[:=]\s*"?)([^"\s,}]+)"#
    )
    .unwrap();
}

/// Initializes the global tracing subscriber.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Multi-line, colorized output for development.
///
/// `RUST_LOG` takes precedence over `config.level`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

/// Replace OVH credentials found in `input` with redaction markers.
///
/// Covers request signatures (`$1$<sha1>`) and the values of consumer key
/// and application secret fields, in JSON or `key=value` form.
pub fn sanitize(input: &str) -> String {
    let result = SIGNATURE.replace_all(input, "[REDACTED_SIGNATURE]");
    SECRET_FIELD
        .replace_all(&result, "${1}[REDACTED]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_signature() {
        let input = "X-Ovh-Signature: $1$0123456789abcdef0123456789abcdef01234567";
        let output = sanitize(input);
        assert!(output.contains("[REDACTED_SIGNATURE]"));
        assert!(!output.contains("0123456789abcdef"));
    }

    #[test]
    fn test_sanitize_consumer_key_json() {
        let input = r#"{"validationUrl":"https://x","consumerKey":"MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1","state":"pendingValidation"}"#;
        let output = sanitize(input);
        assert!(output.contains(r#""consumerKey":"[REDACTED]""#));
        assert!(!output.contains("MtSwSrPp"));
        assert!(output.contains("pendingValidation"));
    }

    #[test]
    fn test_sanitize_key_value() {
        let output = sanitize("application_secret=topsecret region=GRA");
        assert_eq!(output, "application_secret=[REDACTED] region=GRA");
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        assert_eq!(sanitize("GET /cloud/project"), "GET /cloud/project");
    }
}

//! Cross-cutting helpers.
//!
//! - `logging`: tracing initialization and secret redaction.

pub mod logging;

//! Logging initialization
//!
//! Production emits one JSON object per event for the log pipeline; every
//! other environment gets coloured, human-readable lines. `LOG_FORMAT`
//! (`json` or `human`) overrides the environment's choice and `RUST_LOG`
//! overrides the default filter.

use std::env;

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// HTTP client internals log every connection at debug; keep them quiet
/// unless `RUST_LOG` asks for them.
pub const DEFAULT_DIRECTIVES: &str = "info,chartscope=info,hyper=warn,h2=warn,reqwest=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Human,
}

impl LogFormat {
    /// An explicit, recognised override wins; otherwise production means JSON.
    pub fn resolve(environment: &str, format_override: Option<&str>) -> Self {
        match format_override.map(|raw| raw.trim().to_ascii_lowercase()) {
            Some(raw) if raw == "json" => LogFormat::Json,
            Some(raw) if raw == "human" || raw == "pretty" => LogFormat::Human,
            _ if matches!(environment, "production" | "prod") => LogFormat::Json,
            _ => LogFormat::Human,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

pub fn init_logging() {
    let environment = get_environment();
    let format = LogFormat::resolve(&environment, env::var("LOG_FORMAT").ok().as_deref());
    let registry = tracing_subscriber::registry().with(env_filter());

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .init(),
        LogFormat::Human => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .init(),
    }

    tracing::debug!(environment = %environment, format = ?format, "Logging initialized");
}

//! Tracing setup: rolling file output plus stdout, or JSON to file only.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;

/// Targets that flood debug output on every upstream market-data call
const UPSTREAM_HTTP_TARGETS: [&str; 4] = ["hyper", "hyper_util", "reqwest", "h2"];

fn file_appender(config: &AppConfig) -> RollingFileAppender {
    match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    }
}

/// `log_level` plus a `warn` cap on the HTTP client stack, unless
/// `log_upstream_http` is set or `log_level` already names that target
pub fn filter_directives(config: &AppConfig) -> String {
    let mut directives = config.log_level.clone();
    if config.log_upstream_http {
        return directives;
    }
    for target in UPSTREAM_HTTP_TARGETS {
        let named = config
            .log_level
            .split(',')
            .any(|d| d.split('=').next() == Some(target));
        if !named {
            directives.push_str(&format!(",{}=warn", target));
        }
    }
    directives
}

/// Install the global subscriber; keep the guard alive for the process
/// lifetime or buffered file output is lost
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(config));

    // RUST_LOG wins over the config file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}

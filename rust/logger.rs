use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

pub fn init_logging() {
    let directives = filter_directives(env::var("RUST_LOG").ok(), env::var("LOG_LEVEL").ok());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(false)
        .init();
}

/// `RUST_LOG` wins over `LOG_LEVEL`; a bare `LOG_LEVEL` is applied to this
/// crate only so reqwest/hyper stay quiet at debug.
fn filter_directives(rust_log: Option<String>, log_level: Option<String>) -> String {
    if let Some(directives) = rust_log.filter(|val| !val.trim().is_empty()) {
        return directives;
    }
    let level = log_level
        .map(|val| val.trim().to_lowercase())
        .filter(|val| !val.is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    format!("warn,homework_bot={}", level)
}

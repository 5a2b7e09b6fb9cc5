//! Tracing initialisation for the rolegate binary.
//!
//! Logs always go to stderr: stdout carries command output (snapshots, user
//! status) as JSON and must stay machine-readable.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// HTTP and database internals are noisy at debug level.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "reqwest=warn", "rustls=warn", "surrealdb=warn"];

/// Default filter directive when `RUST_LOG` is not set.
pub fn default_directive(level: Level) -> String {
    std::iter::once(level.as_str().to_ascii_lowercase())
        .chain(QUIET_DEPENDENCIES.iter().map(|d| d.to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber: `EnvFilter` from `RUST_LOG` (falling back
/// to [`default_directive`]) and either JSON or human-readable lines.
///
/// Only the first call in a process takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directive_quiets_http_and_db() {
        let directive = default_directive(Level::DEBUG);
        assert!(directive.starts_with("debug,"));
        assert!(directive.contains("surrealdb=warn"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}

//! Log initialisation for applications embedding rosetta
//!
//! The engine itself only emits `tracing` events; this crate installs the
//! subscriber that renders them.

use rosetta_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global `tracing` subscriber described by `config`
///
/// An invalid filter directive falls back to `info` rather than failing.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_filter(&config.filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry.with(fmt_layer).try_init(),
        LogFormat::Json => registry.with(fmt_layer.json().flatten_event(true)).try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
    tracing::debug!(filter = %config.filter, format = ?config.format, "logging initialised");

    Ok(())
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("invalid log filter '{directive}', falling back to info: {e}");
        EnvFilter::new("info")
    })
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        let config = LoggingConfig {
            filter: "rosetta=debug".to_owned(),
            format: LogFormat::Json,
        };
        // Another test binary thread may have won the race; either way the
        // second call must fail cleanly.
        let _ = init(&config);
        assert!(init(&config).is_err());
    }

    #[test]
    fn invalid_filter_falls_back() {
        let filter = build_filter("rosetta=loudest");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}

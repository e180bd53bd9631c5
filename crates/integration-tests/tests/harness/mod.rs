#![allow(dead_code)]

pub mod config;
pub mod fixtures;

use std::sync::Once;

use rosetta_config::LoggingConfig;

/// Install the subscriber once per test binary
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let config = LoggingConfig {
            filter: "rosetta_llm=debug".to_owned(),
            ..LoggingConfig::default()
        };
        if let Err(e) = rosetta_telemetry::init(&config) {
            eprintln!("test logging disabled: {e}");
        }
    });
}

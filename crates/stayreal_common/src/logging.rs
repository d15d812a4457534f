//! Logging setup for the StayReal notifier.
//!
//! Every crate logs through the `tracing` macros; the binary calls
//! [`init_with_level`] once at startup to install the subscriber.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` is honoured; the level given here is added as a directive for
/// the `stayreal` crates. Calling this twice is harmless: the second call
/// leaves the already installed subscriber in place.
///
/// # Arguments
///
/// * `level` - The minimum log level for the `stayreal` crates.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    match format!("stayreal={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Invalid log directive for level {}: {}", level, e),
    }

    // try_init: a global default subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Parses a level name such as `"debug"`, falling back to INFO.
pub fn parse_level(name: &str) -> Level {
    name.parse().unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn test_init_twice_keeps_first_subscriber() {
        init_with_level(Level::DEBUG);
        init_with_level(Level::WARN);
    }
}

//! A minimal stderr logger for the query runner.
//!
//! The level comes from the `QUERY_RUNNER_LOG` environment variable; stdout
//! is reserved for query answers.
use std::io::Write;

use log::{LevelFilter, Metadata, Record};

pub const LEVEL_VAR: &str = "QUERY_RUNNER_LOG";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

pub struct Logger;

pub static LOGGER: Logger = Logger;

/// Installs [`LOGGER`] with the level named by [`LEVEL_VAR`]. Calling it a
/// second time leaves the first logger in place.
pub fn init() {
    let level = std::env::var(LEVEL_VAR)
        .ok()
        .and_then(|s| level_from_str(&s))
        .unwrap_or(DEFAULT_LEVEL);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Parses `off|error|warn|info|debug|trace`, ignoring case and surrounding
/// whitespace.
pub fn level_from_str(s: &str) -> Option<LevelFilter> {
    s.trim().parse().ok()
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Nowhere to report a failed write to stderr.
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::level_from_str;
    use log::LevelFilter;

    #[test]
    fn parses_levels() {
        assert_eq!(level_from_str("trace"), Some(LevelFilter::Trace));
        assert_eq!(level_from_str(" Debug\n"), Some(LevelFilter::Debug));
        assert_eq!(level_from_str("OFF"), Some(LevelFilter::Off));
        assert_eq!(level_from_str("wArN"), Some(LevelFilter::Warn));
        assert_eq!(level_from_str(""), None);
        assert_eq!(level_from_str("verbose"), None);
    }
}

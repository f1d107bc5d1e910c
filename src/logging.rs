//! Diagnostic logging on stderr.
//!
//! Verbosity comes from `GITCONF_LOG` (`error`, `warn`, `info`, `debug` or
//! `trace`); anything else falls back to `warn`. Stdout stays reserved for
//! command output.

use std::env;
use std::io;

use tracing::Level;

/// Environment variable selecting the log level.
pub const LOG_ENV: &str = "GITCONF_LOG";

/// Parse a level name, case-insensitively.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Install the stderr subscriber. A second call is a no-op.
pub fn init() {
    let level = env::var(LOG_ENV)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(Level::WARN);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level(" WARN "), Some(Level::WARN));
        assert_eq!(parse_level("warning"), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_init_twice() {
        init();
        init();
    }
}

//! Logging setup for hosts embedding the driver
//!
//! The driver itself only emits `tracing` events. Hosts that have no
//! subscriber of their own can install one here, sized to the host's debug
//! setting.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// How much the driver logs, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact stderr output at info level
    Development,
    /// Verbose output with thread ids and source locations
    Debug,
}

impl LoggingMode {
    /// Map a host debug verbosity to a mode
    ///
    /// Zero disables logging. Up to 62 ("basic debugging") logs at info
    /// level; anything else, including -1 for "all", enables full debug
    /// output.
    pub fn from_verbosity(verbosity: i32) -> Self {
        match verbosity {
            0 => LoggingMode::Silent,
            1..=62 => LoggingMode::Development,
            _ => LoggingMode::Debug,
        }
    }

    /// Parse a mode name as used by `LUXTRONIK_LOG_MODE`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "silent" => Some(LoggingMode::Silent),
            "development" => Some(LoggingMode::Development),
            "debug" => Some(LoggingMode::Debug),
            _ => None,
        }
    }

    fn default_level(&self) -> &'static str {
        match self {
            LoggingMode::Silent => "off",
            LoggingMode::Development => "info",
            LoggingMode::Debug => "debug",
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),
}

/// Install a global subscriber for `mode`
///
/// Fails if a subscriber is already installed.
///
/// # Environment Variables
///
/// - `LUXTRONIK_LOG_LEVEL`: filter directives (e.g. `luxtronik_sdk=debug`)
/// - `RUST_LOG`: consulted when `LUXTRONIK_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter(mode.default_level())?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter(mode.default_level())?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Install a subscriber chosen by `LUXTRONIK_LOG_MODE`
///
/// Unset or unrecognized values mean silent.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var("LUXTRONIK_LOG_MODE")
        .ok()
        .and_then(|name| LoggingMode::from_name(&name))
        .unwrap_or(LoggingMode::Silent);

    init_logging(mode)
}

/// Build a filter from `LUXTRONIK_LOG_LEVEL`, then `RUST_LOG`, then `default_level`
fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let directives = std::env::var("LUXTRONIK_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level.to_string());

    EnvFilter::try_new(&directives).map_err(|_| LoggingError::InvalidFilter(directives))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, LoggingMode::Silent)]
    #[case(2, LoggingMode::Development)]
    #[case(16, LoggingMode::Development)]
    #[case(62, LoggingMode::Development)]
    #[case(126, LoggingMode::Debug)]
    #[case(144, LoggingMode::Debug)]
    #[case(-1, LoggingMode::Debug)]
    fn test_from_verbosity(#[case] verbosity: i32, #[case] expected: LoggingMode) {
        assert_eq!(LoggingMode::from_verbosity(verbosity), expected);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(LoggingMode::from_name("debug"), Some(LoggingMode::Debug));
        assert_eq!(LoggingMode::from_name(" Development "), Some(LoggingMode::Development));
        assert_eq!(LoggingMode::from_name("loud"), None);
    }

    #[test]
    fn test_silent_installs_nothing() {
        assert!(init_logging(LoggingMode::Silent).is_ok());
    }
}

//! Driver configuration
//!
//! Hosts hand the driver a flat set of string settings. The same settings
//! can be loaded from JSON.

use std::time::Duration;

use luxtronik_api::LuxClient;
use luxtronik_state::logging::LoggingMode;
use luxtronik_state::Language;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted poll interval: one day
pub const MAX_POLL_INTERVAL: u64 = 86_400;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: String, reason: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Settings for one controller connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Controller host name or IP address
    pub address: String,
    pub port: u16,
    /// Seconds between full update cycles
    pub poll_interval: u64,
    /// Language selector: 0 English, 1 Polish, 2 Dutch
    pub language: u8,
    /// Host debug verbosity; 0 disables logging
    pub debug: i32,
    /// Hardware name, used as the device-name prefix
    pub name: String,
    /// Seconds allowed for connecting, reading and writing
    pub io_timeout: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8889,
            poll_interval: 25,
            language: 0,
            debug: 0,
            name: "Luxtronik".to_string(),
            io_timeout: None,
        }
    }
}

impl DriverConfig {
    /// Build a configuration from key/value settings
    ///
    /// Keys are matched case-insensitively, and the host's generic field
    /// names (`Mode2` for the poll interval, `Mode3` for the language,
    /// `Mode6` for debug) are accepted as aliases. Unknown keys are ignored;
    /// missing keys keep their defaults.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref().to_ascii_lowercase().as_str() {
                "address" => config.address = value.to_string(),
                "port" => config.port = parse("port", value)?,
                "poll_interval" | "mode2" => config.poll_interval = parse("poll_interval", value)?,
                "language" | "mode3" => config.language = parse("language", value)?,
                "debug" | "mode6" => config.debug = parse("debug", value)?,
                "name" => config.name = value.to_string(),
                "io_timeout" => {
                    config.io_timeout = if value.is_empty() {
                        None
                    } else {
                        Some(parse("io_timeout", value)?)
                    }
                }
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::invalid("address", "must not be empty"));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid("port", "must be non-zero"));
        }
        if !(1..=MAX_POLL_INTERVAL).contains(&self.poll_interval) {
            return Err(ConfigError::invalid(
                "poll_interval",
                format!("must be between 1 and {} seconds", MAX_POLL_INTERVAL),
            ));
        }
        if Language::from_selector(self.language as i64).is_none() {
            return Err(ConfigError::invalid("language", "must be 0, 1 or 2"));
        }
        if self.io_timeout == Some(0) {
            return Err(ConfigError::invalid("io_timeout", "must be at least 1 second"));
        }
        Ok(())
    }

    pub fn language(&self) -> Language {
        Language::from_selector(self.language as i64).unwrap_or_default()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout.map(Duration::from_secs)
    }

    pub fn logging_mode(&self) -> LoggingMode {
        LoggingMode::from_verbosity(self.debug)
    }

    /// Client for the configured controller
    pub fn client(&self) -> LuxClient {
        LuxClient::new(self.address.clone(), self.port).with_io_timeout(self.io_timeout())
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, format!("'{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = DriverConfig::from_pairs(Vec::<(&str, &str)>::new()).unwrap();
        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(25));
        assert_eq!(config.language(), Language::English);
        assert_eq!(config.logging_mode(), LoggingMode::Silent);
    }

    #[test]
    fn test_host_field_aliases() {
        let config = DriverConfig::from_pairs([
            ("Address", "192.168.1.50"),
            ("Port", "8888"),
            ("Mode2", "30"),
            ("Mode3", "2"),
            ("Mode6", "-1"),
            ("Name", "Heat pump"),
            ("Mode1", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.address, "192.168.1.50");
        assert_eq!(config.port, 8888);
        assert_eq!(config.poll_interval, 30);
        assert_eq!(config.language(), Language::Dutch);
        assert_eq!(config.logging_mode(), LoggingMode::Debug);
        assert_eq!(config.name, "Heat pump");
    }

    #[rstest]
    #[case("port", "0")]
    #[case("port", "70000")]
    #[case("poll_interval", "0")]
    #[case("poll_interval", "soon")]
    #[case("poll_interval", "86401")]
    #[case("poll_interval", "18446744073709551615")]
    #[case("language", "3")]
    #[case("debug", "verbose")]
    #[case("io_timeout", "0")]
    #[case("address", " ")]
    fn test_invalid_values(#[case] key: &str, #[case] value: &str) {
        let result = DriverConfig::from_pairs([(key, value)]);
        assert!(
            matches!(result, Err(ConfigError::Invalid { key: ref k, .. }) if k == key),
            "{} = {:?} gave {:?}",
            key,
            value,
            result
        );
    }

    #[test]
    fn test_io_timeout() {
        let config = DriverConfig::from_pairs([("io_timeout", "5")]).unwrap();
        assert_eq!(config.io_timeout(), Some(Duration::from_secs(5)));

        let config = DriverConfig::from_pairs([("io_timeout", "")]).unwrap();
        assert_eq!(config.io_timeout(), None);
    }

    #[test]
    fn test_from_json() {
        let config = DriverConfig::from_json(r#"{"address": "10.0.0.7", "language": 1}"#).unwrap();
        assert_eq!(config.address, "10.0.0.7");
        assert_eq!(config.language(), Language::Polish);
        assert_eq!(config.port, 8889);

        assert!(matches!(
            DriverConfig::from_json(r#"{"port": 0}"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(DriverConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_settings_are_accepted(port in 1u16.., interval in 1u64..=MAX_POLL_INTERVAL, language in 0u8..3) {
            let config = DriverConfig::from_pairs([
                ("port", port.to_string()),
                ("poll_interval", interval.to_string()),
                ("language", language.to_string()),
            ])
            .unwrap();

            prop_assert_eq!(config.port, port);
            prop_assert_eq!(config.poll_interval(), Duration::from_secs(interval));
            prop_assert_eq!(config.language().selector(), language);
        }
    }
}

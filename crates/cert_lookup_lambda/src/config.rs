use std::time::Duration;

use crate::observability::LogFormat;

pub const LOG_FORMAT_ENV: &str = "CERT_LOOKUP_LOG_FORMAT";
pub const CALLBACK_TIMEOUT_ENV: &str = "CALLBACK_TIMEOUT_SECS";
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported log format '{0}', expected 'json' or 'pretty'")]
    InvalidLogFormat(String),
    #[error("CALLBACK_TIMEOUT_SECS must be a positive integer number of seconds, got '{0}'")]
    InvalidCallbackTimeout(String),
}

/// Process-level settings read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub log_format: LogFormat,
    pub callback_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            callback_timeout: Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => defaults.log_format,
        };

        let callback_timeout = match lookup(CALLBACK_TIMEOUT_ENV) {
            Some(value) if !value.trim().is_empty() => parse_timeout_secs(&value)?,
            _ => defaults.callback_timeout,
        };

        Ok(Self {
            log_format,
            callback_timeout,
        })
    }
}

fn parse_timeout_secs(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidCallbackTimeout(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[])).expect("defaults");
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.callback_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            (LOG_FORMAT_ENV, "pretty"),
            (CALLBACK_TIMEOUT_ENV, "5"),
        ]))
        .expect("overrides");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.callback_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_zero_and_garbage_timeouts() {
        for raw in ["0", "-3", "soon"] {
            let error = RuntimeConfig::from_lookup(lookup_from(&[(CALLBACK_TIMEOUT_ENV, raw)]))
                .expect_err("invalid timeout");
            assert_eq!(error, ConfigError::InvalidCallbackTimeout(raw.to_string()));
        }
    }
}
